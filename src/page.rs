//! Assembly of the output page: titles, the rendered SVG, the
//! floating tooltip panel, and the pointer-event script driving it.

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>United States Educational Attainment</title>
<style>
body {
  font-family: sans-serif;
  margin: 0 auto;
  width: 960px;
}
.states {
  fill: none;
  stroke: #fff;
  stroke-linejoin: round;
}
#tooltip {
  position: absolute;
  opacity: 0;
  pointer-events: none;
  padding: 6px 10px;
  border-radius: 4px;
  box-shadow: 0 1px 4px rgba(0, 0, 0, 0.4);
}
.tooltipText {
  margin: 0;
  font-size: 13px;
}
</style>
</head>
<body>
<div id="app">
<h1 id="title">United States Educational Attainment</h1>
<h3 id="description">Percentage of adults age 25 and older with a bachelor's degree or higher (2010-2014)</h3>
"#;

// Pointer behavior per county path: enter shows the stroke outline,
// move follows the cursor and fills the panel, leave hides it again.
const TOOLTIP_SCRIPT: &str = r#"<script>
const tooltip = document.getElementById('tooltip');
const tooltipInfo = document.getElementById('tooltip-info');
document.querySelectorAll('path.county').forEach((county) => {
  county.addEventListener('mouseover', () => {
    county.setAttribute('stroke', 'black');
    county.setAttribute('cursor', 'pointer');
  });
  county.addEventListener('mouseout', () => {
    county.setAttribute('stroke', 'none');
    tooltip.style.opacity = 0;
  });
  county.addEventListener('mousemove', (event) => {
    const education = county.getAttribute('data-education');
    tooltip.setAttribute('data-education', education);
    tooltip.style.opacity = 1;
    tooltip.style.left = event.clientX - 100 + 'px';
    tooltip.style.top = event.clientY - 80 + 'px';
    tooltip.style.background = county.getAttribute('fill');
    tooltipInfo.textContent = county.getAttribute('county-name') + ', ' +
      county.getAttribute('state-name') + ' ' + education + '%';
  });
});
</script>
"#;

const TOOLTIP_PANEL: &str = r#"</div>
<div id="tooltip"><p id="tooltip-info" class="tooltipText"></p></div>
"#;

const FOOT: &str = "</body>\n</html>\n";

/// Wrap the rendered SVG in the full page.
pub fn render_page(svg: &str) -> String {
    let mut page = String::with_capacity(HEAD.len() + svg.len() + 1024);
    page.push_str(HEAD);
    page.push_str(svg);
    page.push_str(TOOLTIP_PANEL);
    page.push_str(TOOLTIP_SCRIPT);
    page.push_str(FOOT);
    page
}
