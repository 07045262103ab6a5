//! The single-page browser UI.
//!
//! The script mirrors `PromptForm`: submit stays disabled until there is a
//! prompt or a file, drag state drives the drop-zone highlight, and the form
//! resets as soon as a submission is sent.

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>pagesmith</title>
<style>
  * { box-sizing: border-box; }
  body {
    margin: 0;
    font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
    background: #0f1115;
    color: #e6e6e6;
    display: flex;
    flex-direction: column;
    height: 100vh;
  }
  header { padding: 0.75rem 1.25rem; border-bottom: 1px solid #23262d; font-weight: 600; }
  main { flex: 1; display: flex; flex-direction: column; min-height: 0; }
  #output { flex: 1; position: relative; background: #fff; }
  #output iframe { border: 0; width: 100%; height: 100%; display: block; }
  #placeholder {
    position: absolute; inset: 0; display: flex; align-items: center; justify-content: center;
    color: #6b7280; background: #15181e;
  }
  #status { position: absolute; top: 0.75rem; right: 0.75rem; display: flex; gap: 0.5rem; }
  #status button { font-size: 0.8rem; }
  form {
    border-top: 1px solid #23262d;
    padding: 0.75rem 1.25rem 1rem;
    background: #15181e;
  }
  #dropzone {
    display: flex; gap: 0.75rem; align-items: flex-end;
    border: 1px solid #2d313a; border-radius: 12px; padding: 0.5rem; background: #0f1115;
    transition: border-color 0.15s, background 0.15s;
  }
  #dropzone.dragging { border-color: #6366f1; background: #1b1d2e; }
  textarea {
    flex: 1; resize: none; min-height: 2.5rem; max-height: 12rem;
    background: transparent; border: 0; color: inherit; font: inherit; outline: none; padding: 0.4rem;
  }
  button {
    background: #6366f1; color: #fff; border: 0; border-radius: 8px;
    padding: 0.5rem 0.9rem; font: inherit; cursor: pointer;
  }
  button:disabled { background: #3a3d46; color: #8b8f98; cursor: not-allowed; }
  button.ghost { background: transparent; border: 1px solid #2d313a; color: #c9cbd1; }
  #attachment { display: none; align-items: center; gap: 0.5rem; margin-bottom: 0.5rem; font-size: 0.85rem; }
  #attachment.visible { display: flex; }
  #attachment img { width: 48px; height: 48px; object-fit: cover; border-radius: 6px; }
  #attachment .pdf {
    width: 48px; height: 48px; border-radius: 6px; background: #2d313a;
    display: flex; align-items: center; justify-content: center; font-size: 0.7rem;
  }
  #error { color: #f87171; font-size: 0.85rem; margin-top: 0.5rem; min-height: 1em; }
  #file-input { display: none; }
  .spinner {
    width: 1rem; height: 1rem; border: 2px solid #8b8f98; border-top-color: transparent;
    border-radius: 50%; display: inline-block; animation: spin 0.8s linear infinite; vertical-align: middle;
  }
  @keyframes spin { to { transform: rotate(360deg); } }
</style>
</head>
<body>
<header>pagesmith</header>
<main>
  <div id="output">
    <div id="placeholder">Describe a page, or drop an image or PDF, and it will appear here.</div>
    <iframe id="frame" title="Generated page" sandbox="allow-scripts allow-forms allow-modals allow-popups" hidden></iframe>
    <div id="status" hidden>
      <button type="button" class="ghost" id="download">Download</button>
    </div>
  </div>
  <form id="form">
    <div id="attachment">
      <span id="thumb"></span>
      <span id="file-name"></span>
      <button type="button" class="ghost" id="remove">Remove</button>
    </div>
    <div id="dropzone">
      <button type="button" class="ghost" id="pick" title="Attach an image or PDF">Attach</button>
      <input type="file" id="file-input" name="file" accept="image/png,image/jpeg,image/webp,image/heic,image/heif,application/pdf">
      <textarea id="prompt" name="prompt" rows="1" placeholder="Describe the web app you want..."></textarea>
      <button type="submit" id="submit" disabled>Generate</button>
    </div>
    <div id="error"></div>
  </form>
</main>
<script>
(() => {
  const form = document.getElementById('form');
  const prompt = document.getElementById('prompt');
  const fileInput = document.getElementById('file-input');
  const dropzone = document.getElementById('dropzone');
  const submit = document.getElementById('submit');
  const attachmentBox = document.getElementById('attachment');
  const thumb = document.getElementById('thumb');
  const fileName = document.getElementById('file-name');
  const errorBox = document.getElementById('error');
  const frame = document.getElementById('frame');
  const placeholder = document.getElementById('placeholder');
  const status = document.getElementById('status');

  const state = { file: null, dragging: false, generating: false, html: '' };

  const params = new URLSearchParams(location.search);
  const token = params.get('access_token') || params.get('token');
  const endpoint = token ? '/api/generate?access_token=' + encodeURIComponent(token) : '/api/generate';

  const types = ['image/png', 'image/jpeg', 'image/webp', 'image/heic', 'image/heif', 'application/pdf'];
  const accepted = (file) => types.includes(file.type)
    || (!file.type && /\.(pdf|png|jpe?g|webp|heic|heif)$/i.test(file.name));

  function canSubmit() {
    return (prompt.value.trim() !== '' || state.file !== null) && !state.generating;
  }

  function render() {
    submit.disabled = !canSubmit();
    submit.innerHTML = state.generating ? '<span class="spinner"></span> Generating' : 'Generate';
    prompt.disabled = state.generating;
    dropzone.classList.toggle('dragging', state.dragging);

    attachmentBox.classList.toggle('visible', state.file !== null);
    thumb.innerHTML = '';
    if (state.file) {
      fileName.textContent = state.file.name;
      if (state.file.type.startsWith('image/')) {
        const img = document.createElement('img');
        img.alt = state.file.name;
        img.src = URL.createObjectURL(state.file);
        img.onload = () => URL.revokeObjectURL(img.src);
        thumb.appendChild(img);
      } else {
        const pdf = document.createElement('div');
        pdf.className = 'pdf';
        pdf.textContent = 'PDF';
        thumb.appendChild(pdf);
      }
    } else {
      fileName.textContent = '';
    }
  }

  function attach(file) {
    if (!file) return;
    if (!accepted(file)) {
      errorBox.textContent = 'Only PNG, JPEG, WebP, HEIC/HEIF images and PDF documents can be attached.';
      return;
    }
    errorBox.textContent = '';
    state.file = file;
    render();
  }

  function reset() {
    prompt.value = '';
    state.file = null;
    state.dragging = false;
    fileInput.value = '';
    render();
  }

  function show(html) {
    state.html = html;
    frame.srcdoc = html;
    frame.hidden = false;
    placeholder.hidden = true;
    status.hidden = false;
  }

  document.getElementById('pick').addEventListener('click', () => fileInput.click());
  document.getElementById('remove').addEventListener('click', () => {
    state.file = null;
    fileInput.value = '';
    render();
  });
  fileInput.addEventListener('change', () => attach(fileInput.files[0]));
  prompt.addEventListener('input', render);
  prompt.addEventListener('keydown', (e) => {
    if (e.key === 'Enter' && !e.shiftKey) {
      e.preventDefault();
      form.requestSubmit();
    }
  });

  dropzone.addEventListener('dragenter', (e) => { e.preventDefault(); state.dragging = true; render(); });
  dropzone.addEventListener('dragover', (e) => { e.preventDefault(); });
  dropzone.addEventListener('dragleave', (e) => {
    if (!dropzone.contains(e.relatedTarget)) { state.dragging = false; render(); }
  });
  dropzone.addEventListener('drop', (e) => {
    e.preventDefault();
    state.dragging = false;
    attach(e.dataTransfer.files[0]);
    render();
  });

  document.getElementById('download').addEventListener('click', () => {
    const a = document.createElement('a');
    a.href = URL.createObjectURL(new Blob([state.html], { type: 'text/html' }));
    a.download = 'page.html';
    a.click();
  });

  form.addEventListener('submit', async (e) => {
    e.preventDefault();
    if (!canSubmit()) return;

    const body = new FormData();
    body.append('prompt', prompt.value);
    if (state.file) body.append('file', state.file, state.file.name);

    errorBox.textContent = '';
    state.generating = true;
    reset();

    try {
      const res = await fetch(endpoint, { method: 'POST', body });
      const data = await res.json().catch(() => ({ error: res.statusText }));
      if (!res.ok) throw new Error(data.error || ('Request failed with ' + res.status));
      show(data.html);
    } catch (err) {
      console.error(err);
      errorBox.textContent = err.message;
    } finally {
      state.generating = false;
      render();
    }
  });

  render();
})();
</script>
</body>
</html>
"#;
