//! Embedded HTML/CSS/JS frontend for the proposal dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page proposal HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Annual Plan Proposal</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --cyan: #39d2c0;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.hidden { display: none !important; }

/* Gate */
.gate {
  min-height: 100vh;
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 24px;
}

.gate .card { width: 100%; max-width: 380px; text-align: center; }
.gate h1 { font-size: 22px; margin-bottom: 4px; }
.gate p { color: var(--text-muted); font-size: 13px; margin-bottom: 20px; }
.gate input {
  width: 100%;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 10px 12px;
  font-size: 14px;
  margin-bottom: 12px;
}
.gate input:focus { outline: none; border-color: var(--accent); }
.gate .btn { width: 100%; justify-content: center; }
.gate .error { color: var(--red); font-size: 13px; margin-bottom: 12px; min-height: 20px; }

/* Layout */
.shell {
  display: grid;
  grid-template-columns: 240px 1fr;
  min-height: 100vh;
}

aside {
  background: var(--surface);
  border-right: 1px solid var(--border);
  padding: 24px 12px;
}

aside .brand {
  font-size: 16px;
  font-weight: 700;
  padding: 0 12px 4px;
  color: var(--accent);
}

aside .client {
  font-size: 12px;
  color: var(--text-muted);
  padding: 0 12px 20px;
}

nav { display: flex; flex-direction: column; gap: 4px; }

nav button {
  text-align: left;
  padding: 8px 12px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
  transition: all 0.15s;
}

nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }

main { padding: 24px 32px; max-width: 1200px; }

header {
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}

.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
.card h3 { font-size: 14px; font-weight: 600; margin-bottom: 12px; color: var(--text-muted); }
.card p { color: var(--text-muted); }

blockquote {
  border-left: 3px solid var(--accent);
  padding: 8px 16px;
  color: var(--text-muted);
  font-style: italic;
  margin: 16px 0;
}

/* Stats grid */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 24px;
}

.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}

.stat-card .value {
  font-size: 26px;
  font-weight: 700;
  font-family: var(--mono);
  color: var(--accent);
  line-height: 1.1;
}

.stat-card .value.green { color: var(--green); }
.stat-card .value.purple { color: var(--purple); }
.stat-card .value.cyan { color: var(--cyan); }

.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

.benefits { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 12px; }
.benefit { border: 1px solid var(--border); border-radius: 6px; padding: 12px; }
.benefit strong { display: block; margin-bottom: 4px; }
.benefit span { color: var(--text-muted); font-size: 13px; }

/* Distribution bar */
.dist-bar {
  display: flex;
  height: 28px;
  border-radius: 6px;
  overflow: hidden;
  margin-bottom: 12px;
}

.dist-bar .seg {
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: 11px;
  font-weight: 600;
  color: #fff;
  min-width: 30px;
  transition: width 0.4s;
  cursor: default;
}

.dist-legend {
  display: flex;
  flex-wrap: wrap;
  gap: 16px;
  font-size: 12px;
  color: var(--text-muted);
}

.dist-legend .dot {
  display: inline-block;
  width: 10px;
  height: 10px;
  border-radius: 3px;
  margin-right: 4px;
  vertical-align: middle;
}

.members { margin-top: 12px; font-size: 12px; color: var(--text-muted); }
.members div { display: flex; justify-content: space-between; max-width: 360px; }

/* Tables */
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 8px 12px; border-bottom: 1px solid var(--border); }
th {
  color: var(--text-muted);
  font-weight: 500;
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}
td.num { text-align: right; font-family: var(--mono); }
th.num { text-align: right; }
tr:hover { background: rgba(255,255,255,0.02); }
tr.current td { color: var(--green); font-weight: 600; }

/* Bar chart */
.chart {
  display: flex;
  align-items: flex-end;
  gap: 6px;
  height: 200px;
  padding-top: 20px;
  margin-bottom: 8px;
}

.chart .bar-group {
  flex: 1;
  display: flex;
  flex-direction: column;
  align-items: center;
  height: 100%;
  justify-content: flex-end;
}

.chart .bar {
  width: 100%;
  max-width: 40px;
  background: var(--accent);
  border-radius: 3px 3px 0 0;
  min-height: 2px;
  transition: height 0.4s;
  position: relative;
  display: flex;
  flex-direction: column-reverse;
}

.chart .bar .stack { width: 100%; }
.chart .bar:hover { opacity: 0.85; }

.chart .bar-label {
  font-size: 10px;
  color: var(--text-muted);
  margin-top: 6px;
  white-space: nowrap;
}

.chart-tooltip {
  position: absolute;
  bottom: calc(100% + 6px);
  left: 50%;
  transform: translateX(-50%);
  background: #333;
  color: #fff;
  padding: 4px 8px;
  border-radius: 4px;
  font-size: 11px;
  white-space: nowrap;
  pointer-events: none;
  opacity: 0;
  transition: opacity 0.15s;
  z-index: 5;
}

.chart .bar:hover .chart-tooltip { opacity: 1; }

/* Controls */
.controls { display: flex; flex-wrap: wrap; gap: 12px; align-items: center; margin-bottom: 16px; }
.controls label { font-size: 12px; color: var(--text-muted); }
.controls select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-size: 13px;
}
.checks { display: flex; flex-wrap: wrap; gap: 10px; font-size: 12px; }
.checks label { color: var(--text); display: flex; gap: 4px; align-items: center; }

.slider-row { display: flex; align-items: center; gap: 16px; margin-bottom: 16px; }
.slider-row input[type="range"] { flex: 1; accent-color: var(--accent); }
.slider-row .value { font-family: var(--mono); font-size: 18px; color: var(--accent); min-width: 80px; }

.growth.up { color: var(--green); }
.growth.down { color: var(--red); }

ol.steps { list-style: none; counter-reset: step; }
ol.steps li { display: flex; gap: 12px; padding: 10px 0; border-bottom: 1px solid var(--border); }
ol.steps .n {
  flex: 0 0 28px; height: 28px; border-radius: 50%;
  background: var(--accent); color: #fff; display: flex; align-items: center; justify-content: center;
  font-weight: 700; font-size: 13px;
}

ul.insights { list-style: none; }
ul.insights li { padding: 8px 0; border-bottom: 1px solid var(--border); color: var(--text); }

/* Buttons */
.btn {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
  transition: all 0.15s;
  text-decoration: none;
}

.btn:hover { border-color: var(--accent); color: var(--accent); }
.btn.primary { background: var(--accent); color: #fff; border-color: var(--accent); }
.btn.primary:hover { opacity: 0.85; }

.btn-group { display: flex; gap: 8px; margin-top: 16px; }

/* Toast notification */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--green);
  color: #fff;
  font-weight: 500;
  font-size: 13px;
  transform: translateY(80px);
  opacity: 0;
  transition: all 0.3s;
  z-index: 1000;
}

.toast.show { transform: translateY(0); opacity: 1; }
.toast.error { background: var(--red); }

.loading { padding: 40px; color: var(--text-muted); text-align: center; }

.empty { text-align: center; padding: 40px 20px; color: var(--text-muted); }

/* Responsive */
@media (max-width: 768px) {
  .shell { grid-template-columns: 1fr; }
  aside { border-right: none; border-bottom: 1px solid var(--border); }
  nav { flex-direction: row; flex-wrap: wrap; }
  .stats-grid { grid-template-columns: repeat(2, 1fr); }
  main { padding: 16px; }
}
</style>
</head>
<body>

<!-- Password screen -->
<div class="gate hidden" id="gate">
  <div class="card">
    <h1>Annual Plan Proposal</h1>
    <p>Enter the password you received to view this proposal.</p>
    <form id="gate-form">
      <input type="password" id="gate-password" placeholder="Password" autocomplete="off" autofocus>
      <div class="error" id="gate-error"></div>
      <button class="btn primary" type="submit">View Proposal</button>
    </form>
  </div>
</div>

<!-- Dashboard -->
<div class="shell hidden" id="shell">
  <aside>
    <div class="brand" id="brand">Proposal</div>
    <div class="client" id="client"></div>
    <nav id="nav"></nav>
  </aside>
  <main>
    <header>
      <h1 id="page-title"></h1>
      <div class="subtitle" id="page-subtitle"></div>
    </header>
    <div id="page"><div class="loading">Loading...</div></div>
  </main>
</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let session = { preview_mode: false, storage_key: 'isAuthenticated' };
let navData = null;
let currentSection = null;
let usageState = { mode: null, range: null, services: [], months: [] };
let quoteTimer = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));
}

function num(n, digits) {
  if (n === undefined || n === null) return '-';
  return n.toLocaleString('en-US', { minimumFractionDigits: digits || 0, maximumFractionDigits: digits || 0 });
}

function money(n, digits) {
  if (n === undefined || n === null) return '-';
  return (n < 0 ? '-$' : '$') + num(Math.abs(n), digits);
}

function rate(n) { return money(n, 4); }

function compact(n) {
  const a = Math.abs(n);
  if (a >= 1e9) return (n / 1e9).toFixed(1).replace(/\.0$/, '') + 'B';
  if (a >= 1e6) return (n / 1e6).toFixed(1).replace(/\.0$/, '') + 'M';
  if (a >= 1e3) return (n / 1e3).toFixed(1).replace(/\.0$/, '') + 'K';
  return num(n);
}

function pct(n, digits) {
  if (n === undefined || n === null) return '-';
  return n.toFixed(digits === undefined ? 1 : digits) + '%';
}

function unitValue(n, mode) { return mode === 'dollars' ? money(n, 2) : num(n) + ' credits'; }

function stat(value, label, color) {
  return `<div class="stat-card"><div class="value ${color || ''}">${value}</div><div class="label">${esc(label)}</div></div>`;
}

function benefits(list) {
  return '<div class="benefits">' + list.map(b =>
    `<div class="benefit"><strong>${esc(b.title)}</strong><span>${esc(b.description)}</span></div>`
  ).join('') + '</div>';
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------
function isAuthenticated() {
  return localStorage.getItem(session.storage_key) === 'true';
}

function showGate() {
  document.getElementById('shell').classList.add('hidden');
  document.getElementById('gate').classList.remove('hidden');
  document.getElementById('gate-password').focus();
}

async function showApp() {
  document.getElementById('gate').classList.add('hidden');
  document.getElementById('shell').classList.remove('hidden');
  if (!navData) await loadNav();
}

document.getElementById('gate-form').addEventListener('submit', async e => {
  e.preventDefault();
  const input = document.getElementById('gate-password');
  const errorEl = document.getElementById('gate-error');
  try {
    const res = await api('POST', '/api/gate', { password: input.value });
    if (res.granted) {
      localStorage.setItem(session.storage_key, 'true');
      errorEl.textContent = '';
      input.value = '';
      history.pushState({}, '', '/');
      await showApp();
    } else {
      errorEl.textContent = res.message;
    }
  } catch (err) {
    errorEl.textContent = err.message;
  }
});

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
async function loadNav() {
  navData = await api('GET', '/api/sections');
  document.getElementById('brand').textContent = navData.vendor_name;
  document.getElementById('client').textContent = 'Proposal for ' + navData.client_name;
  const nav = document.getElementById('nav');
  nav.innerHTML = navData.sections.map(s =>
    `<button data-section="${s.slug}">${esc(s.title)}</button>`
  ).join('');
  if (navData.sections.length > 0) openSection(navData.sections[0].slug);
}

document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const slug = e.target.dataset.section;
  if (slug) openSection(slug);
});

async function openSection(slug) {
  currentSection = slug;
  document.querySelectorAll('nav button').forEach(b =>
    b.classList.toggle('active', b.dataset.section === slug));
  const page = document.getElementById('page');
  page.innerHTML = '<div class="loading">Loading...</div>';
  try {
    const content = await api('GET', '/api/sections/' + slug);
    document.getElementById('page-title').textContent = content.title;
    document.getElementById('page-subtitle').textContent = content.subtitle;
    switch (content.section) {
      case 'executive-summary': return renderSummary(content);
      case 'usage-analysis': return renderUsage(content);
      case 'annual-plan-benefits': return renderPlan(content);
      case 'next-steps': return renderNextSteps(content);
      case 'about-us': return renderAbout(content);
    }
  } catch (err) {
    page.innerHTML = '<div class="empty">Could not load this section.</div>';
    toast('Failed to load section: ' + err.message, true);
  }
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------
function renderSummary(c) {
  document.getElementById('page').innerHTML = `
    <div class="stats-grid">
      ${stat(money(c.current.monthly_spend), 'Monthly spend (' + c.current.month + ')')}
      ${stat(money(c.current.annual_run_rate_spend), 'Annual run rate', 'purple')}
      ${stat(compact(c.current.monthly_credits), 'Monthly credits', 'cyan')}
      ${stat(money(c.savings_range.min) + ' - ' + money(c.savings_range.max), 'Potential annual savings', 'green')}
    </div>
    <div class="card">
      <h2>Overview</h2>
      <p>${esc(c.overview)}</p>
      <blockquote>${esc(c.quote)}</blockquote>
    </div>
    <div class="card">
      <h2>Highlights</h2>
      <table><tbody>
        ${c.highlights.map(h => `<tr><td>${esc(h.label)}</td><td class="num">${esc(h.value)}</td></tr>`).join('')}
        <tr><td>Growth since ${esc(c.first_month)}</td><td class="num">${pct(c.growth_since_first, 0)}</td></tr>
      </tbody></table>
    </div>
    <div class="card">
      <h2>Why an annual plan</h2>
      ${benefits(c.benefits)}
      <div class="btn-group"><button class="btn primary" onclick="openSection('annual-plan-benefits')">${esc(c.call_to_action)}</button></div>
    </div>`;
}

// ---------------------------------------------------------------------------
// Usage analysis
// ---------------------------------------------------------------------------
function renderUsage(c) {
  if (usageState.mode === null) {
    usageState.mode = c.default_mode;
    usageState.range = c.default_range;
  }
  document.getElementById('page').innerHTML = `
    <div class="card">
      <div class="controls">
        <label>Show
          <select id="u-mode">
            <option value="credits">Credits</option>
            <option value="dollars">Dollars</option>
          </select>
        </label>
        <label>Range
          <select id="u-range">${c.ranges.map(r => `<option value="${r.value}">${esc(r.label)}</option>`).join('')}</select>
        </label>
        <label>Month
          <select id="u-month"><option value="">All months</option>${c.months.map(m => `<option>${esc(m)}</option>`).join('')}</select>
        </label>
      </div>
      <div class="checks" id="u-services">
        ${c.services.map(s => `<label><input type="checkbox" value="${s.key}" ${usageState.services.length === 0 || usageState.services.includes(s.key) ? 'checked' : ''}>
          <span class="dot" style="display:inline-block;width:10px;height:10px;border-radius:3px;background:${s.color}"></span>${esc(s.name)}</label>`).join('')}
      </div>
    </div>
    <div id="u-view"><div class="loading">Loading...</div></div>
    <div class="card"><h2>Spend Growth</h2><div class="chart" id="spend-chart"></div><p id="spend-growth"></p></div>
    <div class="card"><h2>Insights</h2><ul class="insights" id="insights"></ul></div>
    <div class="card">
      <h2>Credit Cost Per Product</h2>
      <table><thead><tr><th>Service</th><th>Credit cost</th></tr></thead><tbody>
        ${c.services.map(s => `<tr><td>${esc(s.name)}</td><td>${esc(s.credit_cost)}</td></tr>`).join('')}
      </tbody></table>
      <p style="margin-top:12px;font-size:13px">${esc(c.credit_cost_note)}</p>
    </div>`;

  document.getElementById('u-mode').value = usageState.mode;
  document.getElementById('u-range').value = usageState.range;
  document.getElementById('u-month').value = usageState.months[0] || '';

  document.getElementById('u-mode').addEventListener('change', e => { usageState.mode = e.target.value; loadUsage(); });
  document.getElementById('u-range').addEventListener('change', e => { usageState.range = e.target.value; loadUsage(); });
  document.getElementById('u-month').addEventListener('change', e => {
    usageState.months = e.target.value ? [e.target.value] : [];
    loadUsage();
  });
  document.getElementById('u-services').addEventListener('change', () => {
    const boxes = [...document.querySelectorAll('#u-services input')];
    const checked = boxes.filter(b => b.checked).map(b => b.value);
    usageState.services = checked.length === boxes.length ? [] : checked;
    loadUsage();
  });

  loadUsage();
  loadSpend();
  loadInsights();
}

async function loadUsage() {
  const q = new URLSearchParams({ mode: usageState.mode, range: usageState.range });
  if (usageState.services.length) q.set('services', usageState.services.join(','));
  if (usageState.months.length) q.set('months', usageState.months.join(','));
  try {
    renderUsageView(await api('GET', '/api/usage?' + q.toString()));
  } catch (err) {
    toast('Failed to load usage: ' + err.message, true);
  }
}

function renderUsageView(v) {
  const el = document.getElementById('u-view');
  if (!el) return;
  if (!v.last_month) {
    el.innerHTML = '<div class="card empty">No usage for this selection.</div>';
    return;
  }
  const mode = v.mode;
  const max = Math.max(...v.services.map(s => s.usage), 1);
  const monthMax = Math.max(...v.monthly.map(m => m.total), 1);

  el.innerHTML = `
    <div class="stats-grid">
      ${stat(mode === 'dollars' ? money(v.totals.last_month_total) : compact(v.totals.last_month_total), 'Usage in ' + v.last_month)}
      ${stat(money(v.totals.total_cost), 'Total cost ' + v.last_month, 'purple')}
      ${stat(pct(v.growth.average, 0), 'Avg monthly growth', 'green')}
      ${stat(pct(v.growth.recent, 1), 'Recent growth (3 mo)', 'cyan')}
    </div>
    <div class="card">
      <h2>Service Usage Breakdown</h2>
      <div class="chart">
        ${v.services.map(s => `
          <div class="bar-group">
            <div class="bar" style="height:${Math.max(s.usage / max * 100, 1)}%;background:${s.color}">
              <span class="chart-tooltip">${esc(s.name)}: ${unitValue(s.usage, mode)} (${s.growth >= 0 ? '+' : ''}${s.growth}%)</span>
            </div>
            <div class="bar-label">${esc(s.name)}</div>
          </div>`).join('')}
      </div>
      <table><thead><tr><th>Service</th><th class="num">Usage</th><th class="num">Growth</th></tr></thead><tbody>
        ${v.services.map(s => `<tr><td>${esc(s.name)}</td><td class="num">${unitValue(s.usage, mode)}</td>
          <td class="num growth ${s.growth >= 0 ? 'up' : 'down'}">${s.growth >= 0 ? '+' : ''}${s.growth}%</td></tr>`).join('')}
      </tbody></table>
    </div>
    <div class="card">
      <h2>Category Distribution</h2>
      <div class="dist-bar">
        ${v.categories.map((c, i) => `<div class="seg" data-idx="${i}" style="width:${Math.max(c.value, 3)}%;background:${c.color}" title="${esc(c.name)}: ${c.value.toFixed(2)}%">${c.value >= 8 ? c.value.toFixed(0) + '%' : ''}</div>`).join('')}
      </div>
      <div class="dist-legend">
        ${v.categories.map(c => `<span><span class="dot" style="background:${c.color}"></span>${esc(c.name)} ${c.value.toFixed(1)}%</span>`).join('')}
      </div>
      ${v.categories.filter(c => c.is_group).map(g => `
        <div class="members"><strong>${esc(g.name)} includes:</strong>
          ${g.members.map(m => `<div><span>${esc(m.name)}</span><span>${m.value.toFixed(1)}% | ${unitValue(m.actual_value, mode)}</span></div>`).join('')}
        </div>`).join('')}
    </div>
    <div class="card">
      <h2>Monthly Usage</h2>
      <div class="chart">
        ${v.monthly.map(m => `
          <div class="bar-group">
            <div class="bar" style="height:${Math.max(m.total / monthMax * 100, 1)}%;background:transparent">
              ${Object.entries(m.values).filter(([, val]) => val > 0).map(([key, val]) => {
                const svc = v.services.find(s => s.key === key);
                const color = svc ? svc.color : 'var(--text-muted)';
                return `<div class="stack" style="height:${val / m.total * 100}%;background:${color}"></div>`;
              }).join('')}
              <span class="chart-tooltip">${esc(m.month)}: ${unitValue(m.total, mode)}</span>
            </div>
            <div class="bar-label">${esc(m.month)}</div>
          </div>`).join('')}
      </div>
    </div>`;
}

async function loadSpend() {
  try {
    const s = await api('GET', '/api/usage/spend');
    const el = document.getElementById('spend-chart');
    if (!el) return;
    const max = Math.max(...s.points.map(p => p.spend), 1);
    el.innerHTML = s.points.map(p => `
      <div class="bar-group">
        <div class="bar" style="height:${Math.max(p.spend / max * 100, 1)}%">
          <span class="chart-tooltip">${esc(p.month)}: ${money(p.spend, 2)} (prev ${money(p.previous_spend, 2)})</span>
        </div>
        <div class="bar-label">${esc(p.month)}</div>
      </div>`).join('');
    document.getElementById('spend-growth').textContent =
      pct(s.average_recent_growth, 0) + ' average monthly spend growth over the last three months';
  } catch (err) {
    toast('Failed to load spend: ' + err.message, true);
  }
}

async function loadInsights() {
  try {
    const res = await api('GET', '/api/usage/insights');
    const el = document.getElementById('insights');
    if (el) el.innerHTML = res.insights.map(i => `<li>${esc(i)}</li>`).join('');
  } catch (err) {
    toast('Failed to load insights: ' + err.message, true);
  }
}

// ---------------------------------------------------------------------------
// Annual plan benefits
// ---------------------------------------------------------------------------
function renderPlan(c) {
  const s = c.slider;
  const rec = c.recommendation;
  document.getElementById('page').innerHTML = `
    <div class="stats-grid">
      ${stat(money(c.current.monthly_spend), 'Current monthly spend')}
      ${stat(compact(c.current.annualized_credits), 'Annualized credits', 'cyan')}
      ${stat(rec.commitment_millions + 'M', 'Recommended commitment', 'purple')}
      ${stat(money(c.cost_of_not_switching), 'Cost of not switching', 'green')}
    </div>
    <div class="card">
      <h2>Annual Commitment Calculator</h2>
      <div class="slider-row">
        <input type="range" id="commitment" min="${s.min}" max="${s.max}" step="${s.step}" value="${s.default}">
        <span class="value" id="commitment-value">${s.default}M</span>
      </div>
      <div class="stats-grid" id="quote-stats"></div>
      <p id="quote-vs"></p>
    </div>
    <div class="card">
      <h2>Volume Discount Tiers</h2>
      <table><thead><tr>
        <th>Commitment</th><th class="num">Discount</th><th class="num">Per credit</th>
        <th class="num">Annual cost</th><th class="num">Annual savings</th><th>Price lock</th>
      </tr></thead><tbody id="tier-rows"></tbody></table>
      <p style="margin-top:12px;font-size:12px">${esc(c.disclaimer)}</p>
    </div>
    <div class="card">
      <h2>Benefits of Annual Commitment</h2>
      ${benefits(c.benefits)}
      <p style="margin-top:16px">${esc(c.top_up_policy)}</p>
    </div>`;

  renderTierRows(c.tiers);
  const slider = document.getElementById('commitment');
  slider.addEventListener('input', () => {
    document.getElementById('commitment-value').textContent = slider.value + 'M';
    clearTimeout(quoteTimer);
    quoteTimer = setTimeout(() => loadQuote(slider.value), 120);
  });
  loadQuote(s.default);
}

function renderTierRows(rows) {
  document.getElementById('tier-rows').innerHTML = rows.map(r => `
    <tr class="${r.is_current ? 'current' : ''}">
      <td>${r.tier.threshold_millions}M credits/yr</td>
      <td class="num">${pct(r.tier.discount * 100, 0)}</td>
      <td class="num">${rate(r.tier.price_per_credit)}</td>
      <td class="num">${money(r.discounted_annual_cost)}</td>
      <td class="num">${money(r.annual_savings)}</td>
      <td>${r.price_lock ? 'Yes' : '-'}</td>
    </tr>`).join('');
}

async function loadQuote(commitment) {
  try {
    const res = await api('GET', '/api/pricing/quote?commitment=' + encodeURIComponent(commitment));
    const q = res.quote;
    const el = document.getElementById('quote-stats');
    if (!el) return;
    el.innerHTML = `
      ${stat(money(q.discounted_monthly_cost, 2), 'Monthly cost')}
      ${stat(money(q.standard_monthly_cost, 2), 'Standard monthly cost', 'purple')}
      ${stat(money(q.annual_savings), 'Annual savings', 'green')}
      ${stat(q.free_months_equivalent.toFixed(1), 'Months of free service', 'cyan')}
      ${stat(rate(q.price_per_credit), pct(q.discount * 100, 0) + ' off ' + rate(q.base_rate))}`;
    const vs = q.versus_current;
    document.getElementById('quote-vs').textContent = vs
      ? `Compared with your current annual run rate of ${money(vs.current_annual_spend)}, this commitment ` +
        (vs.savings_vs_current_spend >= 0
          ? `costs ${money(vs.savings_vs_current_spend)} less per year.`
          : `costs ${money(-vs.savings_vs_current_spend)} more per year for ${compact(vs.credits_above_current)} additional credits.`)
      : '';
    renderTierRows(res.tiers);
  } catch (err) {
    toast('Failed to load quote: ' + err.message, true);
  }
}

// ---------------------------------------------------------------------------
// Next steps and about
// ---------------------------------------------------------------------------
function renderNextSteps(c) {
  document.getElementById('page').innerHTML = `
    <blockquote>${esc(c.quote)}</blockquote>
    <div class="card">
      <h2>Your Path Forward</h2>
      <ol class="steps">
        ${c.steps.map(s => `<li><span class="n">${s.number}</span><div><strong>${esc(s.title)}</strong><p>${esc(s.description)}</p></div></li>`).join('')}
      </ol>
      <div class="btn-group"><a class="btn primary" href="${esc(c.booking_url)}" target="_blank" rel="noopener">Schedule Call</a></div>
    </div>
    <div class="card">
      <h2>Your Contact</h2>
      <table><tbody>
        <tr><td>Name</td><td>${esc(c.contact.name)}</td></tr>
        <tr><td>Title</td><td>${esc(c.contact.title)}</td></tr>
        <tr><td>Email</td><td><a class="btn" href="mailto:${esc(c.contact.email)}">${esc(c.contact.email)}</a></td></tr>
        <tr><td>Phone</td><td>${esc(c.contact.phone)}</td></tr>
      </tbody></table>
    </div>
    <div class="card">
      <h2>Company Details</h2>
      <table><tbody>
        <tr><td>Company</td><td>${esc(c.company.vendor)}</td></tr>
        <tr><td>Website</td><td>${esc(c.company.website)}</td></tr>
        <tr><td>Client</td><td>${esc(c.company.client)}</td></tr>
        <tr><td>Proposal date</td><td>${esc(c.company.proposal_date)}</td></tr>
      </tbody></table>
    </div>`;
}

function renderAbout(c) {
  document.getElementById('page').innerHTML = `
    <div class="card">
      <h2>Our Mission</h2>
      <p>${esc(c.mission)}</p>
      <blockquote>${esc(c.founder_quote)}</blockquote>
    </div>
    <div class="card"><h2>What We Offer</h2>${benefits(c.offerings)}</div>
    <div class="card">
      <h2>Company Overview</h2>
      <table><tbody>${c.overview.map(f => `<tr><td>${esc(f.label)}</td><td>${esc(f.value)}</td></tr>`).join('')}</tbody></table>
      <div class="btn-group">${c.links.map(l => `<a class="btn" href="${esc(l.url)}" target="_blank" rel="noopener">${esc(l.label)}</a>`).join('')}</div>
    </div>`;
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
(async function init() {
  try {
    session = await api('GET', '/api/session');
  } catch (err) {
    toast('Failed to load session settings', true);
  }
  if (!session.preview_mode) localStorage.removeItem(session.storage_key);

  if (location.pathname === '/password' || !isAuthenticated()) {
    showGate();
  } else {
    await showApp();
  }
})();

window.addEventListener('popstate', () => {
  if (location.pathname === '/password' || !isAuthenticated()) showGate();
  else showApp();
});
</script>
</body>
</html>
"##;
