use crate::model::Report;

/// Render a self-contained HTML page: the SVG chart inline, plus the report
/// data (embedded as JSON) shown as a table under it.
///
/// Important: we avoid `format!()` because the page contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_report(report: &Report, title: &str, svg: &str) -> anyhow::Result<String> {
    // `</` would end the script element early.
    let json = serde_json::to_string(report)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .main { padding: 12px 16px; }
  .chart svg { max-width: 100%; height: auto; }

  table { border-collapse: collapse; margin-top: 16px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
</style>
</head>
<body>
<header>
  <h2>__TITLE__</h2>
  <div class="summary" id="summary"></div>
</header>

<div class="main">
  <div class="chart">
__CHART__
  </div>

  <table id="dataTable">
    <thead id="dataHead"></thead>
    <tbody id="dataBody"></tbody>
  </table>
</div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

function fmt(x) {
  return typeof x === "number" ? (Math.round(x * 100000) / 100000).toString() : String(x);
}

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

// Column headers and rows for each analysis.
function tableOf(d) {
  switch (d.analysis) {
    case "setup_timers":
      return {
        head: ["timer", ...d.sources],
        rows: d.timers.map((t, k) => [t, ...d.max_times.map(col => col[k])]),
      };
    case "strong_scaling":
      return {
        head: ["series", ...d.processes.map(p => `${p} cores`)],
        rows: d.labels.map((l, k) => [l, ...d.values[k]]),
      };
    case "solve_per_level":
      return {
        head: ["level", ...d.categories],
        rows: d.levels.map(l => [l.level, ...l.times]),
      };
    case "history":
      return {
        head: ["step", "substep", d.kind],
        rows: d.steps.flatMap(s => s.entries.map(e => [s.step, e.substep, e.values.map(fmt).join(", ")])),
      };
  }
  return { head: [], rows: [] };
}

function renderSummary() {
  const el = document.getElementById("summary");
  let pills = `<span class="pill">analysis: <b>${escapeHtml(DATA.analysis)}</b></span>`;
  if (DATA.style) pills += `<span class="pill">style: <b>${escapeHtml(DATA.style)}</b></span>`;
  if (DATA.sources) pills += `<span class="pill">runs: <b>${DATA.sources.length}</b></span>`;
  if (DATA.processes) pills += `<span class="pill">processes: <b>${DATA.processes.map(fmt).join(", ")}</b></span>`;
  el.innerHTML = pills;
}

function renderTable() {
  const t = tableOf(DATA);
  document.getElementById("dataHead").innerHTML =
    "<tr>" + t.head.map(h => `<th>${escapeHtml(h)}</th>`).join("") + "</tr>";
  document.getElementById("dataBody").innerHTML = t.rows
    .map(r => "<tr>" + r.map(c =>
      typeof c === "number" ? `<td class="num">${fmt(c)}</td>` : `<td>${escapeHtml(c)}</td>`
    ).join("") + "</tr>")
    .join("");
}

renderSummary();
renderTable();
</script>
</body>
</html>
"#;

    Ok(TEMPLATE
        .replace("__TITLE__", &escape_html(title))
        .replace("__CHART__", svg)
        .replace("__DATA__", &json))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
