//! Embedded HTML/CSS/JS frontend for the alertdash web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Disaster Management Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --red: #f85149;
  --orange: #db6d28;
  --green: #3fb950;
  --yellow: #d29922;
  --blue: #388bfd;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.layout { display: flex; min-height: 100vh; }

aside {
  flex: 0 0 220px;
  background: var(--surface);
  border-right: 1px solid var(--border);
  padding: 24px 16px;
}

aside h2 { font-size: 16px; margin-bottom: 12px; }
aside .hint { color: var(--text-muted); font-size: 12px; margin-bottom: 8px; }

aside label {
  display: flex;
  align-items: center;
  gap: 8px;
  padding: 6px 8px;
  border-radius: 6px;
  cursor: pointer;
}

aside label:hover { background: rgba(255,255,255,0.04); }

main { flex: 1; padding: 24px 32px; max-width: 1200px; }

header h1 {
  font-size: 26px;
  font-weight: 600;
  margin-bottom: 20px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

h2.view-title { font-size: 20px; margin-bottom: 16px; }
h3 { font-size: 15px; margin: 16px 0 8px; }

.panel { display: none; }
.panel.active { display: block; }

.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}

/* Buttons and inputs */
.btn {
  padding: 8px 16px;
  border: 1px solid var(--accent);
  border-radius: 6px;
  background: var(--accent);
  color: #fff;
  font-size: 13px;
  cursor: pointer;
}

.btn:hover { opacity: 0.85; }
.btn:disabled { opacity: 0.5; cursor: wait; }

input[type="text"], select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 8px 10px;
  font-size: 14px;
  width: 100%;
  margin-bottom: 12px;
}

input:focus, select:focus { outline: none; border-color: var(--accent); }

/* Alerts */
.alert {
  padding: 10px 14px;
  border-radius: 6px;
  margin-bottom: 8px;
  border-left: 4px solid;
}

.alert.error { background: rgba(248,81,73,0.12); border-color: var(--red); }
.alert.warning { background: rgba(210,153,34,0.12); border-color: var(--yellow); }
.alert.info { background: rgba(56,139,253,0.12); border-color: var(--blue); }

/* Bar chart */
.chart {
  display: flex;
  align-items: flex-end;
  gap: 24px;
  height: 220px;
  padding: 20px 12px 0;
  border-bottom: 1px solid var(--border);
}

.chart .bar-group {
  flex: 1;
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: flex-end;
  height: 100%;
}

.chart .bar {
  width: 100%;
  max-width: 64px;
  border-radius: 3px 3px 0 0;
  transition: height 0.4s;
}

.chart .count { font-size: 12px; margin-bottom: 4px; }
.chart-labels { display: flex; gap: 24px; padding: 6px 12px 0; }
.chart-labels span { flex: 1; text-align: center; color: var(--text-muted); font-size: 12px; }

/* Chat */
.reply { white-space: pre-wrap; }

.loading {
  display: flex;
  align-items: center;
  color: var(--text-muted);
  padding: 12px 0;
}

.spinner {
  width: 18px;
  height: 18px;
  border: 2px solid var(--border);
  border-top-color: var(--accent);
  border-radius: 50%;
  animation: spin 0.6s linear infinite;
  margin-right: 10px;
}

@keyframes spin { to { transform: rotate(360deg); } }

/* Guide */
ol.steps { list-style: none; }
ol.steps li { padding: 6px 0; }
ol.steps b { margin-right: 6px; }

@media (max-width: 768px) {
  .layout { flex-direction: column; }
  aside { flex: none; border-right: none; border-bottom: 1px solid var(--border); }
  .columns { grid-template-columns: 1fr; }
}
</style>
</head>
<body>
<div class="layout">

  <!-- Sidebar navigation -->
  <aside>
    <h2>Navigation</h2>
    <div class="hint">Go to</div>
    <form id="nav">
      <label><input type="radio" name="page" value="dashboard" checked> Dashboard</label>
      <label><input type="radio" name="page" value="chatbot"> Chatbot</label>
      <label><input type="radio" name="page" value="guide"> Response Guide</label>
    </form>
  </aside>

  <main>
    <header><h1>&#128680; Disaster Management Dashboard</h1></header>

    <!-- Dashboard -->
    <section class="panel active" id="panel-dashboard">
      <h2 class="view-title">Emergency Messages Overview</h2>
      <button class="btn" id="generate" disabled>Generate Random Messages</button>
      <div class="columns" id="sample" style="display:none; margin-top: 20px">
        <div class="card">
          <h3>&#128202; Message Distribution</h3>
          <div class="chart" id="chart"></div>
          <div class="chart-labels" id="chart-labels"></div>
        </div>
        <div>
          <h3>&#128680; High Severity Messages</h3>
          <div id="list-high"></div>
          <h3>&#9888;&#65039; Medium Severity Messages</h3>
          <div id="list-medium"></div>
          <h3>&#8505;&#65039; Low Severity Messages</h3>
          <div id="list-low"></div>
        </div>
      </div>
    </section>

    <!-- Chatbot -->
    <section class="panel" id="panel-chatbot">
      <h2 class="view-title">&#128172; Emergency Response Chatbot</h2>
      <div id="doc-notice"></div>
      <form id="chat-form">
        <label for="question">Ask a question about disaster management:</label>
        <input type="text" id="question" autocomplete="off">
      </form>
      <div id="chat-busy" class="loading" style="display:none"><div class="spinner"></div>Getting response...</div>
      <div id="chat-notice"></div>
      <div class="card reply" id="chat-reply" style="display:none"></div>
    </section>

    <!-- Response Guide -->
    <section class="panel" id="panel-guide">
      <h2 class="view-title">&#127384; Emergency Response Guide</h2>
      <label for="disaster-type">Select Disaster Type</label>
      <select id="disaster-type">
        <option>Wildfire</option>
        <option>Earthquake</option>
        <option>Flood</option>
      </select>
      <h3 id="guide-title"></h3>
      <ol class="steps" id="guide-steps"></ol>
      <div class="alert info" id="guide-advisory"></div>
    </section>
  </main>
</div>

<script>
// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {}, credentials: 'same-origin' };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function el(tag, cls, text) {
  const node = document.createElement(tag);
  if (cls) node.className = cls;
  if (text !== undefined) node.textContent = text;
  return node;
}

function notice(containerId, text, kind) {
  const box = document.getElementById(containerId);
  box.innerHTML = '';
  if (text) box.appendChild(el('div', 'alert ' + (kind || 'error'), text));
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------
// Session-scoped calls wait for the cookie so the first click reuses it.
const sessionReady = api('GET', '/api/session')
  .catch(() => null)
  .finally(() => { document.getElementById('generate').disabled = false; });

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
let documentRequested = false;

document.getElementById('nav').addEventListener('change', e => {
  const page = e.target.value;
  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById('panel-' + page).classList.add('active');
  if (page === 'chatbot') loadDocument();
  if (page === 'guide') loadGuide();
});

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------
function renderList(id, messages, kind) {
  const box = document.getElementById(id);
  box.innerHTML = '';
  messages.forEach(m => box.appendChild(el('div', 'alert ' + kind, m)));
}

function renderChart(chart) {
  const bars = document.getElementById('chart');
  const labels = document.getElementById('chart-labels');
  bars.innerHTML = '';
  labels.innerHTML = '';
  const max = Math.max(1, ...chart.bars.map(b => b.count));
  chart.bars.forEach(b => {
    const group = el('div', 'bar-group');
    group.appendChild(el('div', 'count', String(b.count)));
    const bar = el('div', 'bar');
    bar.style.height = (b.count / max * 100) + '%';
    bar.style.background = b.color;
    bar.title = b.label + ': ' + b.count;
    group.appendChild(bar);
    bars.appendChild(group);
    labels.appendChild(el('span', '', b.label));
  });
}

document.getElementById('generate').addEventListener('click', async () => {
  await sessionReady;
  const data = await api('POST', '/api/dashboard/sample');
  if (data.error) return;
  document.getElementById('sample').style.display = 'grid';
  renderChart(data.chart);
  renderList('list-high', data.high, 'error');
  renderList('list-medium', data.medium, 'warning');
  renderList('list-low', data.low, 'info');
});

// ---------------------------------------------------------------------------
// Chatbot
// ---------------------------------------------------------------------------
async function loadDocument() {
  if (documentRequested) return;
  documentRequested = true;
  notice('doc-notice', 'Loading reference document...', 'info');
  await sessionReady;
  const data = await api('GET', '/api/chat/document');
  notice('doc-notice', data.notice || '', 'error');
}

document.getElementById('chat-form').addEventListener('submit', async e => {
  e.preventDefault();
  const input = document.getElementById('question');
  const question = input.value.trim();
  if (!question) return;

  const busy = document.getElementById('chat-busy');
  const reply = document.getElementById('chat-reply');
  busy.style.display = 'flex';
  input.disabled = true;
  reply.style.display = 'none';
  notice('chat-notice', '');

  try {
    await sessionReady;
    const data = await api('POST', '/api/chat', { question });
    notice('chat-notice', data.notice || data.error || '');
    if (data.reply) {
      reply.textContent = data.reply;
      reply.style.display = 'block';
    }
  } finally {
    busy.style.display = 'none';
    input.disabled = false;
  }
});

// ---------------------------------------------------------------------------
// Response Guide
// ---------------------------------------------------------------------------
async function loadGuide() {
  const type = document.getElementById('disaster-type').value;
  const data = await api('GET', '/api/guide?type=' + encodeURIComponent(type));
  document.getElementById('guide-title').textContent = 'Response Steps for ' + data.disaster_type;
  const list = document.getElementById('guide-steps');
  list.innerHTML = '';
  data.steps.forEach((step, i) => {
    const item = el('li');
    item.appendChild(el('b', '', (i + 1) + '.'));
    item.appendChild(document.createTextNode(step));
    list.appendChild(item);
  });
  document.getElementById('guide-advisory').textContent = data.advisory;
}

document.getElementById('disaster-type').addEventListener('change', loadGuide);

</script>
</body>
</html>
"##;
