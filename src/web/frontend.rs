//! Embedded HTML/CSS/JS frontend for the apichart dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. Charts are drawn
//! as inline SVG from the `/api/chart` view.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>apichart</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --grid: #21262d;
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

.app {
  max-width: 1200px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  gap: 12px;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 22px;
  font-weight: 600;
  font-family: var(--mono);
  color: var(--accent);
}

header form {
  display: flex;
  flex: 1;
  gap: 8px;
}

input[type=text] {
  flex: 1;
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 6px 10px;
  font-family: var(--mono);
}

button {
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 6px 12px;
  cursor: pointer;
}
button:hover { border-color: var(--accent); }
button.active { background: var(--accent); color: var(--bg); border-color: var(--accent); }
button:disabled { opacity: 0.5; cursor: default; border-color: var(--border); }

.layout {
  display: grid;
  grid-template-columns: 220px 1fr;
  gap: 24px;
}

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  margin-bottom: 16px;
}

.card h2 {
  font-size: 13px;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--text-muted);
  margin-bottom: 10px;
}

.list button {
  display: block;
  width: 100%;
  text-align: left;
  margin-bottom: 4px;
  font-family: var(--mono);
}

.columns {
  display: flex;
  flex-wrap: wrap;
  gap: 6px;
}

.muted { color: var(--text-muted); }

.chart-wrap { position: relative; }
svg text { fill: var(--text-muted); font-size: 11px; font-family: var(--mono); }
svg .grid { stroke: var(--grid); }

.legend {
  display: flex;
  flex-wrap: wrap;
  gap: 14px;
  margin-top: 8px;
}
.legend .swatch {
  display: inline-block;
  width: 10px;
  height: 10px;
  border-radius: 2px;
  margin-right: 6px;
}

.tooltip {
  position: absolute;
  pointer-events: none;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 8px 10px;
  font-size: 12px;
  display: none;
  white-space: nowrap;
}
.tooltip .title { font-weight: 600; margin-bottom: 4px; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>apichart</h1>
    <form id="url-form">
      <input type="text" id="url" spellcheck="false">
      <button type="submit">Discover</button>
    </form>
  </header>

  <div class="layout">
    <aside>
      <div class="card">
        <h2>Endpoints</h2>
        <div class="list" id="endpoints"><span class="muted">Nothing discovered yet</span></div>
        <button id="fetch-btn" disabled>Fetch data</button>
      </div>
      <div class="card">
        <h2>Chart type</h2>
        <button data-type="bar" class="chart-type">Bar</button>
        <button data-type="line" class="chart-type">Line</button>
      </div>
    </aside>

    <main>
      <div class="card">
        <h2>Columns <span class="muted" id="record-count"></span></h2>
        <div class="columns" id="columns"><span class="muted">Fetch an endpoint to list its columns</span></div>
      </div>
      <div class="card chart-wrap" id="chart-card">
        <svg id="chart" width="100%" height="420"></svg>
        <div class="legend" id="legend"></div>
        <div class="tooltip" id="tooltip"></div>
      </div>
    </main>
  </div>
</div>

<script>
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
  return res.json();
}

function el(tag, attrs, text) {
  const node = document.createElement(tag);
  Object.entries(attrs || {}).forEach(([k, v]) => node.setAttribute(k, v));
  if (text !== undefined) node.textContent = text;
  return node;
}

const SVG_NS = 'http://www.w3.org/2000/svg';
function svg(tag, attrs, text) {
  const node = document.createElementNS(SVG_NS, tag);
  Object.entries(attrs || {}).forEach(([k, v]) => node.setAttribute(k, v));
  if (text !== undefined) node.textContent = text;
  return node;
}

// ---------------------------------------------------------------------------
// State rendering
// ---------------------------------------------------------------------------
function renderState(state) {
  const url = document.getElementById('url');
  if (document.activeElement !== url) url.value = state.base_url;

  const endpoints = document.getElementById('endpoints');
  endpoints.innerHTML = '';
  if (state.endpoints.length === 0) {
    endpoints.appendChild(el('span', { class: 'muted' }, 'Nothing discovered yet'));
  }
  state.endpoints.forEach(name => {
    const b = el('button', {}, name);
    if (name === state.selected_endpoint) b.classList.add('active');
    b.addEventListener('click', async () => {
      renderState(await api('POST', '/api/endpoint', { endpoint: name }));
    });
    endpoints.appendChild(b);
  });
  document.getElementById('fetch-btn').disabled = !state.selected_endpoint;

  const columns = document.getElementById('columns');
  columns.innerHTML = '';
  if (state.schema.length === 0) {
    columns.appendChild(el('span', { class: 'muted' }, 'Fetch an endpoint to list its columns'));
  }
  state.schema.forEach(col => {
    const b = el('button', {}, col);
    const pos = state.selection.indexOf(col);
    if (pos >= 0) {
      b.classList.add('active');
      b.title = pos === 0 ? 'category axis' : 'series';
    }
    b.addEventListener('click', async () => {
      await refresh(await api('POST', '/api/columns/toggle', { column: col }));
    });
    columns.appendChild(b);
  });

  document.getElementById('record-count').textContent =
    state.record_count ? '(' + state.record_count + ' records)' : '';

  document.querySelectorAll('.chart-type').forEach(b => {
    b.classList.toggle('active', b.dataset.type === state.chart_type);
  });
}

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------
function numeric(v) {
  if (typeof v === 'number') return v;
  if (typeof v === 'string' && v.trim() !== '' && isFinite(Number(v))) return Number(v);
  return null;
}

function renderChart(data) {
  const root = document.getElementById('chart');
  const legend = document.getElementById('legend');
  const tooltip = document.getElementById('tooltip');
  root.innerHTML = '';
  legend.innerHTML = '';
  tooltip.style.display = 'none';

  const view = data.chart;
  if (!view) {
    root.appendChild(svg('text', { x: 20, y: 30 }, 'Select columns to chart: the first is the category axis.'));
    return;
  }

  const width = root.clientWidth || 800;
  const height = 420;
  const m = { top: 16, right: 16, bottom: 56, left: 56 };
  const plotW = width - m.left - m.right;
  const plotH = height - m.top - m.bottom;
  const upper = data.y_upper > 0 ? data.y_upper : 1;
  const rows = view.rows;
  const n = Math.max(rows.length, 1);
  const band = plotW / n;
  const y = v => m.top + plotH - (Math.max(0, Math.min(v, upper)) / upper) * plotH;

  // Grid and Y ticks
  data.ticks.forEach(t => {
    const ty = y(t.value);
    root.appendChild(svg('line', { class: 'grid', x1: m.left, x2: m.left + plotW, y1: ty, y2: ty }));
    root.appendChild(svg('text', { x: m.left - 8, y: ty + 4, 'text-anchor': 'end' }, t.label));
  });

  // Category labels
  rows.forEach((row, i) => {
    const cx = m.left + band * i + band / 2;
    const label = row[view.category_key];
    root.appendChild(svg('text', {
      x: cx, y: m.top + plotH + 16, 'text-anchor': 'middle'
    }, label === null ? '' : String(label)));
  });

  // Series
  const s = view.series.length;
  view.series.forEach((series, k) => {
    if (view.chart_type === 'line') {
      const pts = [];
      rows.forEach((row, i) => {
        const v = numeric(row[series.key]);
        if (v !== null) pts.push((m.left + band * i + band / 2) + ',' + y(v));
      });
      root.appendChild(svg('polyline', {
        points: pts.join(' '), fill: 'none', stroke: series.color, 'stroke-width': 2
      }));
      pts.forEach(p => {
        const [px, py] = p.split(',');
        root.appendChild(svg('circle', { cx: px, cy: py, r: 3, fill: series.color }));
      });
    } else {
      const inner = band * 0.8;
      const barW = inner / Math.max(s, 1);
      rows.forEach((row, i) => {
        const v = numeric(row[series.key]);
        if (v === null) return;
        const top = y(v);
        root.appendChild(svg('rect', {
          x: m.left + band * i + band * 0.1 + barW * k,
          y: top,
          width: Math.max(barW - 1, 1),
          height: m.top + plotH - top,
          fill: series.color
        }));
      });
    }

    const item = el('span');
    const swatch = el('span', { class: 'swatch' });
    swatch.style.background = series.color;
    item.appendChild(swatch);
    item.appendChild(document.createTextNode(series.label));
    legend.appendChild(item);
  });

  // Hover targets, one per category
  rows.forEach((row, i) => {
    const hit = svg('rect', {
      x: m.left + band * i, y: m.top, width: band, height: plotH, fill: 'transparent'
    });
    hit.addEventListener('mousemove', e => showTooltip(e, data.tooltips[i]));
    hit.addEventListener('mouseleave', () => tooltip.style.display = 'none');
    root.appendChild(hit);
  });
}

function showTooltip(e, tip) {
  const tooltip = document.getElementById('tooltip');
  if (!tip) return;
  tooltip.innerHTML = '';
  tooltip.appendChild(el('div', { class: 'title' }, tip.title));
  tip.entries.forEach(entry => {
    const line = el('div');
    const swatch = el('span', { class: 'swatch' });
    swatch.style.cssText = 'display:inline-block;width:8px;height:8px;margin-right:6px;background:' + entry.color;
    line.appendChild(swatch);
    line.appendChild(document.createTextNode(entry.name + ': ' + entry.value));
    tooltip.appendChild(line);
  });
  const card = document.getElementById('chart-card').getBoundingClientRect();
  tooltip.style.left = (e.clientX - card.left + 12) + 'px';
  tooltip.style.top = (e.clientY - card.top + 12) + 'px';
  tooltip.style.display = 'block';
}

async function refresh(state) {
  renderState(state || await api('GET', '/api/state'));
  renderChart(await api('GET', '/api/chart'));
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------
document.getElementById('url-form').addEventListener('submit', async e => {
  e.preventDefault();
  const url = document.getElementById('url').value.trim();
  if (!url) return;
  await api('POST', '/api/url', { url });
  await refresh(await api('POST', '/api/discover'));
});

document.getElementById('fetch-btn').addEventListener('click', async () => {
  await refresh(await api('POST', '/api/fetch'));
});

document.querySelectorAll('.chart-type').forEach(b => {
  b.addEventListener('click', async () => {
    await refresh(await api('POST', '/api/chart-type', { chart_type: b.dataset.type }));
  });
});

window.addEventListener('resize', async () => renderChart(await api('GET', '/api/chart')));

refresh();
</script>
</body>
</html>
"##;
