/// Embedded web assets for the neighborhood viewer
use crate::config::ViewerConfig;
use serde_json::json;

const CONFIG_PLACEHOLDER: &str = "__SITEGRAPH_CONFIG__";

/// The viewer page with the configured hop defaults and navigation prefix
/// baked into its script.
pub fn index_page(viewer: &ViewerConfig) -> String {
    let config = json!({
        "defaultHops": viewer.default_hops.min(viewer.max_hops),
        "maxHops": viewer.max_hops,
        "navigablePrefix": viewer.navigable_prefix,
        "sectionRoot": viewer.section_root,
    });
    // Keep `</script>` in a configured string from closing the tag.
    let literal = config.to_string().replace('<', "\\u003c");
    INDEX_HTML.replace(CONFIG_PLACEHOLDER, &literal)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sitegraph - Link Neighborhood</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #111;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
            position: relative;
        }

        #sidebar {
            width: 280px;
            background: #1a1a1a;
            border-left: 1px solid #333;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.3em;
            margin-bottom: 14px;
            color: #3b82f6;
        }

        h2 {
            font-size: 0.9em;
            margin: 15px 0 8px;
            color: #888;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 6px 0;
            border-bottom: 1px solid #333;
            font-size: 0.9em;
        }

        .stat-value {
            color: #3b82f6;
            font-weight: bold;
            word-break: break-all;
        }

        .controls {
            display: flex;
            flex-direction: column;
            gap: 10px;
        }

        .controls input[type=text] {
            width: 100%;
            background: #222;
            color: #eee;
            border: 1px solid #444;
            padding: 4px 6px;
        }

        #reload {
            position: absolute;
            top: 8px;
            right: 8px;
            background: none;
            border: none;
            color: #60a5fa;
            font-size: 16px;
            cursor: pointer;
        }

        #reload:hover {
            color: #93c5fd;
        }

        .status {
            position: absolute;
            inset: 0;
            display: flex;
            align-items: center;
            justify-content: center;
            color: #6b7280;
            font-size: 12px;
        }

        .link {
            stroke: #444;
            stroke-opacity: 0.4;
            stroke-width: 0.8;
        }

        .node text {
            fill: #fff;
            font-size: 8px;
            pointer-events: none;
            text-shadow: 0 0 3px rgba(0, 0, 0, 0.8);
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="graph">
            <div class="status" id="status">Loading graph...</div>
            <button type="button" id="reload" aria-label="Reload graph" title="Reload graph">&#8635;</button>
        </div>
        <div id="sidebar">
            <h1>Sitegraph</h1>

            <h2>Neighborhood</h2>
            <div class="stat">
                <span>Current</span>
                <span class="stat-value" id="stat-current">-</span>
            </div>
            <div class="stat">
                <span>Pages</span>
                <span class="stat-value" id="stat-nodes">-</span>
            </div>
            <div class="stat">
                <span>Links</span>
                <span class="stat-value" id="stat-links">-</span>
            </div>

            <h2>Controls</h2>
            <div class="controls">
                <label>
                    Page
                    <input type="text" id="location" value="/">
                </label>
                <label>
                    Hops <span id="hops-value"></span>
                    <input type="range" id="hops" min="0" step="1">
                </label>
            </div>
        </div>
    </div>

    <script>
        const config = __SITEGRAPH_CONFIG__;
        const params = new URLSearchParams(window.location.search);
        let current = params.get('current') || '/';
        let hops = parseInt(params.get('hops'), 10);
        if (Number.isNaN(hops)) hops = config.defaultHops;
        hops = Math.max(0, Math.min(hops, config.maxHops));
        let simulation = null;
        let loadTicket = 0;

        function setStatus(text) {
            const el = document.getElementById('status');
            el.style.display = text ? 'flex' : 'none';
            el.textContent = text || '';
        }

        function teardown() {
            if (simulation) {
                simulation.stop();
                simulation = null;
            }
            d3.select('#graph').select('svg').remove();
        }

        async function load() {
            const ticket = ++loadTicket;
            teardown();
            setStatus('Loading graph...');

            const container = document.getElementById('graph');
            const W = container.clientWidth;
            const H = container.clientHeight;
            const query = `current=${encodeURIComponent(current)}&hops=${hops}&width=${W}&height=${H}`;

            let data;
            try {
                const response = await fetch(`/api/layout?${query}`);
                if (!response.ok) {
                    throw new Error(`HTTP error! status: ${response.status}`);
                }
                data = await response.json();
            } catch (e) {
                console.error('Failed to fetch graph data:', e);
                if (ticket === loadTicket) setStatus('Graph not available');
                return;
            }
            if (ticket !== loadTicket) return;

            setStatus(data.nodes.length ? '' : 'No page matches this location');
            document.getElementById('stat-current').textContent = data.current || '-';
            document.getElementById('stat-nodes').textContent = data.nodes.length;
            document.getElementById('stat-links').textContent = data.links.length;
            build(data, W, H);
        }

        function build(data, W, H) {
            const nodes = data.nodes.map(d => ({ ...d, fx: null, fy: null }));
            const links = data.links.map(l => ({ ...l }));

            const svg = d3.select('#graph')
                .append('svg')
                .attr('width', W)
                .attr('height', H);

            const inner = svg.append('g');
            svg.call(d3.zoom()
                .scaleExtent([0.3, 3])
                .on('zoom', ({ transform }) => inner.attr('transform', transform)));

            const link = inner.append('g')
                .selectAll('line')
                .data(links)
                .join('line')
                .attr('class', 'link');

            const node = inner.append('g')
                .selectAll('g')
                .data(nodes)
                .join('g')
                .attr('class', 'node');

            const isCurrent = d => d.id === data.current;

            node.append('circle')
                .attr('r', d => d.radius)
                .attr('fill', d => d.ext ? '#ff9b00' : '#fff')
                .attr('stroke', d => isCurrent(d) ? '#3b82f6' : '#fff')
                .attr('stroke-width', d => isCurrent(d) ? 3 : (d.ext ? 1.5 : 0.8))
                .on('click', (event, d) => {
                    if (event.defaultPrevented || d.ext) return;
                    if (!d.id.startsWith(config.navigablePrefix)) return;
                    current = d.id;
                    document.getElementById('location').value = current;
                    load();
                });

            node.append('text')
                .text(d => d.label.length > 15 ? d.label.substring(0, 15) + '...' : d.label)
                .attr('x', 8)
                .attr('y', 3);

            simulation = d3.forceSimulation(nodes)
                .force('link', d3.forceLink(links).id(d => d.id).distance(80))
                .force('charge', d3.forceManyBody().strength(-300))
                .force('collide', d3.forceCollide().radius(d => d.radius + 10))
                .force('center', d3.forceCenter(W / 2, H / 2))
                .alpha(0.05)
                .alphaDecay(0.05)
                .on('tick', () => {
                    link
                        .attr('x1', d => d.source.x).attr('y1', d => d.source.y)
                        .attr('x2', d => d.target.x).attr('y2', d => d.target.y);
                    node.attr('transform', d => `translate(${d.x},${d.y})`);
                });

            const held = nodes.find(isCurrent);
            if (held) {
                held.fx = W / 2;
                held.fy = H / 2;
            }

            node.call(d3.drag()
                .on('start', (e, d) => {
                    if (!e.active) simulation.alphaTarget(0.3).restart();
                    d.fx = d.x; d.fy = d.y;
                })
                .on('drag', (e, d) => { d.fx = e.x; d.fy = e.y; })
                .on('end', (e, d) => {
                    if (!e.active) simulation.alphaTarget(0);
                    if (d === held) {
                        d.fx = W / 2; d.fy = H / 2;
                    } else {
                        d.fx = d.fy = null;
                    }
                }));
        }

        document.getElementById('reload').addEventListener('click', load);

        document.getElementById('hops').addEventListener('input', (e) => {
            hops = parseInt(e.target.value, 10);
            document.getElementById('hops-value').textContent = hops;
            load();
        });

        document.getElementById('location').addEventListener('change', (e) => {
            current = e.target.value || '/';
            load();
        });

        window.addEventListener('resize', () => {
            if (!simulation) return;
            const container = document.getElementById('graph');
            const w = container.clientWidth;
            const h = container.clientHeight;
            d3.select('#graph').select('svg').attr('width', w).attr('height', h);
            simulation.force('center', d3.forceCenter(w / 2, h / 2)).alpha(0.3).restart();
        });

        window.addEventListener('beforeunload', () => {
            loadTicket++;
            teardown();
        });

        document.getElementById('location').value = current;
        document.getElementById('hops').max = config.maxHops;
        document.getElementById('hops').value = hops;
        document.getElementById('hops-value').textContent = hops;
        load();
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_injected() {
        let viewer = ViewerConfig {
            navigable_prefix: "/blog/".to_string(),
            default_hops: 3,
            max_hops: 5,
            ..ViewerConfig::default()
        };
        let page = index_page(&viewer);
        assert!(!page.contains(CONFIG_PLACEHOLDER));
        assert!(page.contains(r#""defaultHops":3"#));
        assert!(page.contains(r#""maxHops":5"#));
        assert!(page.contains(r#""navigablePrefix":"/blog/""#));
    }

    #[test]
    fn test_script_close_escaped() {
        let viewer = ViewerConfig {
            section_root: "</script><b>".to_string(),
            ..ViewerConfig::default()
        };
        let page = index_page(&viewer);
        assert!(!page.contains("</script><b>"));
        assert!(page.contains(r"\u003c/script>"));
    }
}
