// Embedded single-page chat UI
// Served from memory so the binary has no asset directory to ship

pub(crate) const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Trip Guide</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f4f6f8; color: #1c2733; }
  main { max-width: 720px; margin: 0 auto; padding: 1.5rem 1rem 7rem; }
  h1 { font-size: 1.4rem; margin: 0 0 0.25rem; }
  p.subtitle { margin: 0 0 1rem; color: #5a6b7b; font-size: 0.9rem; }
  #examples { display: flex; flex-wrap: wrap; gap: 0.5rem; margin-bottom: 1rem; }
  #examples button, #clear {
    border: 1px solid #c6d0da; background: #fff; border-radius: 1rem;
    padding: 0.35rem 0.8rem; font-size: 0.8rem; cursor: pointer;
  }
  #examples button:hover, #clear:hover { background: #e8eef4; }
  #transcript { display: flex; flex-direction: column; gap: 0.6rem; }
  .turn { max-width: 85%; padding: 0.6rem 0.9rem; border-radius: 0.75rem; white-space: pre-wrap; }
  .turn.user { align-self: flex-end; background: #1d6fd1; color: #fff; }
  .turn.assistant { align-self: flex-start; background: #fff; border: 1px solid #dbe3ea; }
  .turn.error { align-self: flex-start; background: #fbe9e9; border: 1px solid #e4b6b6; color: #8a2f2f; }
  form { position: fixed; bottom: 0; left: 0; right: 0; background: #fff; border-top: 1px solid #dbe3ea; }
  form > div { max-width: 720px; margin: 0 auto; display: flex; gap: 0.5rem; padding: 0.75rem 1rem; }
  input[type=text] { flex: 1; padding: 0.6rem 0.8rem; border: 1px solid #c6d0da; border-radius: 0.5rem; font-size: 0.95rem; }
  button[type=submit] { padding: 0.6rem 1.2rem; border: none; border-radius: 0.5rem; background: #1d6fd1; color: #fff; cursor: pointer; }
  button[type=submit]:disabled { background: #9db8d6; cursor: wait; }
</style>
</head>
<body>
<main>
  <h1>🧭 Trip Guide</h1>
  <p class="subtitle">Ask about group type, season, budget, and days — answers come from the curated trip corpus.</p>
  <div id="examples"></div>
  <div id="transcript"></div>
  <p style="margin-top:1rem"><button id="clear">Clear chat history</button></p>
</main>
<form id="composer">
  <div>
    <input type="text" id="message" placeholder="e.g. boys trip winter budget 15000 4 days" autocomplete="off">
    <button type="submit" id="send">Send</button>
  </div>
</form>
<script>
const transcript = document.getElementById('transcript');
const composer = document.getElementById('composer');
const messageInput = document.getElementById('message');
const sendButton = document.getElementById('send');

function renderTurn(role, content) {
  const div = document.createElement('div');
  div.className = 'turn ' + role;
  div.textContent = content;
  transcript.appendChild(div);
  div.scrollIntoView({ behavior: 'smooth', block: 'end' });
}

async function refreshHistory() {
  const turns = await fetch('/api/history').then(r => r.json());
  transcript.replaceChildren();
  for (const turn of turns) renderTurn(turn.role, turn.content);
}

async function loadExamples() {
  const examples = await fetch('/api/examples').then(r => r.json());
  const container = document.getElementById('examples');
  for (const example of examples) {
    const button = document.createElement('button');
    button.type = 'button';
    button.textContent = example;
    button.addEventListener('click', () => submitMessage(example));
    container.appendChild(button);
  }
}

async function submitMessage(message) {
  if (!message || sendButton.disabled) return;
  sendButton.disabled = true;
  messageInput.disabled = true;
  renderTurn('user', message);
  try {
    const response = await fetch('/api/chat', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ message }),
    });
    const body = await response.json();
    if (response.ok) {
      renderTurn('assistant', body.reply);
    } else {
      renderTurn('error', body.error || 'The assistant could not answer.');
    }
  } catch (e) {
    renderTurn('error', 'Request failed: ' + e);
  } finally {
    sendButton.disabled = false;
    messageInput.disabled = false;
    messageInput.focus();
  }
}

composer.addEventListener('submit', (event) => {
  event.preventDefault();
  const message = messageInput.value.trim();
  messageInput.value = '';
  submitMessage(message);
});

document.getElementById('clear').addEventListener('click', async () => {
  await fetch('/api/clear', { method: 'POST' });
  await refreshHistory();
});

loadExamples();
refreshHistory();
</script>
</body>
</html>
"#;
