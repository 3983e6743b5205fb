//! Full gallery document
//!
//! Two modes share one template:
//!
//! - **Static**: a self-contained snapshot. The grid holds the filtered cards,
//!   detail views ride along as `<template>` elements, and the filter
//!   controls show the applied state but are disabled.
//! - **Live**: served by `fabric-gallery serve`. Filter changes go to
//!   `/api/gallery` and detail views come from `/api/fabric/{index}`; the
//!   filtering itself always runs in Rust.
//!
//! The script below only does DOM work: lazy image loading, load-failure
//! fallback, modal handling, the magnifier lens and the floating filter bar.

use crate::config::{GalleryConfig, PLACEHOLDER_IMAGE};
use crate::error::LOAD_FAILED_MESSAGE;
use crate::filter::{FilterField, FilterOptions, FilterState};
use crate::render::escape_html;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Static,
    Live,
}

pub struct Page<'a> {
    pub mode: PageMode,
    pub options: &'a FilterOptions,
    pub state: &'a FilterState,
    /// Pre-rendered grid contents
    pub gallery: String,
    /// Pre-rendered detail views by catalog index (static mode)
    pub details: Vec<(usize, String)>,
    pub config: &'a GalleryConfig,
    pub generated: String,
    /// Shown in the header, e.g. "12 of 40 fabrics"
    pub summary: String,
}

/// Settings handed to the page script as JSON
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptConfig<'a> {
    live: bool,
    debounce_ms: u64,
    lazy_margin_px: f64,
    buffer_zone_px: f64,
    placeholder: &'a str,
    error_message: &'a str,
    magnifier: MagnifierSettings,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MagnifierSettings {
    zoom: f64,
    min_lens_px: f64,
    max_lens_px: f64,
    lens_ratio: f64,
}

pub fn write<W: Write>(writer: &mut W, page: &Page) -> io::Result<()> {
    let live = page.mode == PageMode::Live;
    let m = page.config.magnifier;

    let script_config = ScriptConfig {
        live,
        debounce_ms: page.config.debounce_ms(),
        lazy_margin_px: page.config.lazy_margin_px,
        buffer_zone_px: page.config.buffer_zone_px,
        placeholder: PLACEHOLDER_IMAGE,
        error_message: LOAD_FAILED_MESSAGE,
        magnifier: MagnifierSettings {
            zoom: m.zoom,
            min_lens_px: m.min_lens_px,
            max_lens_px: m.max_lens_px,
            lens_ratio: m.lens_ratio,
        },
    };
    // `</` cannot appear inside a JSON script block
    let config_json = serde_json::to_string(&script_config)?.replace("</", "<\\/");

    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sample Fabrics</title>
    <style>{style}</style>
</head>
<body>
    <h1>Sample Fabrics <span class="summary">{summary}</span></h1>
    <div id="filterControls" class="filter-controls">
        <div class="filter-wrapper">
            <label for="searchInput">Search</label>
            <input type="text" id="searchInput" placeholder="Name or SKU" value="{search}"{disabled}>
        </div>
"#,
        style = STYLE,
        summary = escape_html(&page.summary),
        search = escape_html(page.state.search()),
        disabled = if live { "" } else { " disabled" },
    )?;

    for field in FilterField::ALL {
        write_multi_select(writer, field, page.options, page.state, live)?;
    }

    let roll_width = if page.state.min_roll_width() > 0.0 {
        page.state.min_roll_width().to_string()
    } else {
        String::new()
    };

    write!(
        writer,
        r#"        <div class="filter-wrapper">
            <label for="rollWidthFilter">Min Roll Width</label>
            <input type="number" id="rollWidthFilter" min="0" value="{roll_width}"{disabled}>
        </div>
        <button type="button" id="resetFilters"{disabled}>Reset</button>
    </div>
    <button type="button" id="filterBtn" class="filter-btn" aria-label="Show filters">Filters</button>
    <div id="fabricGrid" class="fabric-grid">{gallery}</div>
"#,
        disabled = if live { "" } else { " disabled" },
        gallery = page.gallery,
    )?;

    for (index, html) in &page.details {
        write!(writer, "    <template id=\"detail-{}\">{}</template>\n", index, html)?;
    }

    write!(
        writer,
        r#"    <footer>Generated {generated}</footer>
    <script id="gallery-config" type="application/json">{config_json}</script>
    <script>{script}</script>
</body>
</html>
"#,
        generated = escape_html(&page.generated),
        script = SCRIPT,
    )?;

    Ok(())
}

fn write_multi_select<W: Write>(
    writer: &mut W,
    field: FilterField,
    options: &FilterOptions,
    state: &FilterState,
    live: bool,
) -> io::Result<()> {
    let selected = state.selected(field);
    let toggle_text = if selected.is_empty() {
        format!("Select {}", field.label())
    } else {
        format!("{} {} selected", selected.len(), field.label())
    };

    write!(
        writer,
        r#"        <div class="filter-wrapper">
            <label for="{id}">{label}</label>
            <div class="multi-select" id="{id}" data-key="{key}" data-label="{label}">
                <button type="button" class="multi-select-toggle">{toggle_text}</button>
                <div class="multi-select-options">
"#,
        id = field.id(),
        key = field.key(),
        label = field.label(),
    )?;

    for value in options.values(field) {
        let checked = state.is_selected(field, &value);
        write!(
            writer,
            r#"                    <div class="multi-select-option"><input type="checkbox" id="{id}" value="{value}"{checked}{disabled}><label for="{id}">{value}</label></div>
"#,
            id = escape_html(&option_id(field, &value)),
            value = escape_html(&value),
            checked = if checked { " checked" } else { "" },
            disabled = if live { "" } else { " disabled" },
        )?;
    }

    write!(writer, "                </div>\n                <div class=\"selected-tags\">")?;
    for value in &selected {
        write!(writer, "<span class=\"selected-tag\">{}</span>", escape_html(value))?;
    }
    write!(writer, "</div>\n            </div>\n        </div>\n")?;

    Ok(())
}

/// Checkbox id: field id plus the value with whitespace runs as dashes
pub fn option_id(field: FilterField, value: &str) -> String {
    let slug: Vec<&str> = value.split_whitespace().collect();
    format!("{}-{}", field.id(), slug.join("-"))
}

/// Minimal document for a failed load
pub fn write_error<W: Write>(writer: &mut W) -> io::Result<()> {
    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Sample Fabrics</title><style>{style}</style></head>
<body><h1>Sample Fabrics</h1><div id="fabricGrid" class="fabric-grid"><p>{message}</p></div></body>
</html>
"#,
        style = STYLE,
        message = LOAD_FAILED_MESSAGE,
    )
}

const STYLE: &str = r#"
:root { --bg: #f5f5f7; --card: #ffffff; --border: #d2d2d7; --text: #1d1d1f; --dim: #86868b; --accent: #007aff; --warn: #ff9f0a; }
* { box-sizing: border-box; }
body { margin: 0; padding: 0 1rem 2rem; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; background: var(--bg); color: var(--text); }
h1 { margin: 0; padding: 1.5rem 0 1rem; font-size: 2rem; }
h1 .summary { font-size: 1rem; font-weight: 400; color: var(--dim); margin-left: .5rem; }
.filter-controls { position: sticky; top: 0; z-index: 20; display: flex; flex-wrap: wrap; gap: 1rem; align-items: flex-end; padding: 1rem; background: var(--card); border: 1px solid var(--border); border-radius: 12px; transition: opacity .2s; }
.filter-controls.hidden { opacity: 0; pointer-events: none; }
.filter-controls.floating { position: absolute; left: 50%; transform: translateX(-50%); width: calc(100% - 2rem); max-width: 1400px; opacity: 1; }
.filter-wrapper { display: flex; flex-direction: column; gap: .25rem; min-width: 160px; }
.filter-wrapper label { font-size: .8rem; color: var(--dim); text-transform: uppercase; letter-spacing: .04em; }
.multi-select { position: relative; }
.multi-select-toggle { width: 100%; text-align: left; padding: .4rem .6rem; border: 1px solid var(--border); border-radius: 6px; background: var(--card); cursor: pointer; }
.multi-select-options { display: none; position: absolute; z-index: 30; max-height: 260px; overflow-y: auto; min-width: 100%; background: var(--card); border: 1px solid var(--border); border-radius: 6px; padding: .25rem 0; }
.multi-select.open .multi-select-options { display: block; }
.multi-select-option { display: flex; gap: .4rem; padding: .2rem .6rem; white-space: nowrap; }
.selected-tags { display: flex; flex-wrap: wrap; gap: .25rem; margin-top: .25rem; }
.selected-tag { background: var(--accent); color: #fff; border-radius: 999px; padding: 0 .5rem; font-size: .75rem; }
.remove-tag { margin-left: .3rem; cursor: pointer; }
.filter-btn { display: none; position: fixed; right: 1.5rem; bottom: 1.5rem; z-index: 40; align-items: center; justify-content: center; padding: .75rem 1rem; border: 0; border-radius: 999px; background: var(--accent); color: #fff; cursor: pointer; }
.fabric-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; margin-top: 1rem; }
.fabric-card { position: relative; background: var(--card); border: 1px solid var(--border); border-radius: 12px; overflow: hidden; cursor: pointer; }
.fabric-card img { width: 100%; aspect-ratio: 1; object-fit: cover; display: block; background: #e5e5ea; }
.fabric-card img.placeholder { filter: blur(4px); }
.fabric-card p { margin: .5rem .75rem .75rem; }
.fabric-card.low-stock { border-color: var(--warn); }
.stock-badge { position: absolute; top: .5rem; left: .5rem; background: var(--warn); color: #fff; font-size: .7rem; padding: .1rem .5rem; border-radius: 999px; }
.no-results { grid-column: 1 / -1; text-align: center; color: var(--dim); }
.modal { position: fixed; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,.6); }
.modal-content { position: relative; background: var(--card); border-radius: 12px; padding: 1.5rem; max-width: min(720px, 92vw); max-height: 92vh; overflow-y: auto; }
.close { position: absolute; top: .5rem; right: .75rem; font-size: 1.75rem; cursor: pointer; }
.magnifier-host { position: relative; }
.detail-image { max-width: 100%; display: block; }
.magnifier-lens { position: absolute; pointer-events: none; border: 2px solid #fff; border-radius: 50%; box-shadow: 0 2px 12px rgba(0,0,0,.35); background-repeat: no-repeat; }
footer { margin-top: 2rem; color: var(--dim); font-size: .8rem; text-align: center; }
"#;

const SCRIPT: &str = r#"
(function () {
    const cfg = JSON.parse(document.getElementById('gallery-config').textContent);
    const grid = document.getElementById('fabricGrid');
    const search = document.getElementById('searchInput');
    const rollWidth = document.getElementById('rollWidthFilter');
    const reset = document.getElementById('resetFilters');
    const controls = document.getElementById('filterControls');
    const filterBtn = document.getElementById('filterBtn');
    const header = document.querySelector('h1');

    function debounce(fn, wait) {
        let timeout;
        return (...args) => {
            clearTimeout(timeout);
            timeout = setTimeout(() => fn(...args), wait);
        };
    }

    // Lazy images: load once within the margin, then stop watching
    let observer = null;
    function observeImages() {
        if (observer) observer.disconnect();
        observer = new IntersectionObserver((entries, obs) => {
            entries.forEach(entry => {
                if (!entry.isIntersecting) return;
                const img = entry.target;
                img.src = img.dataset.src;
                img.classList.remove('placeholder');
                obs.unobserve(img);
            });
        }, { rootMargin: `0px 0px ${cfg.lazyMarginPx}px 0px` });
        grid.querySelectorAll('img.placeholder').forEach(img => observer.observe(img));
    }

    grid.addEventListener('error', e => {
        const img = e.target;
        if (img.tagName !== 'IMG' || img.src === cfg.placeholder) return;
        console.error('Image failed to load:', img.dataset.src);
        img.src = cfg.placeholder;
        const card = img.closest('.fabric-card');
        if (card) card.remove();
    }, true);

    // Detail view
    function openDetail(html) {
        const holder = document.createElement('div');
        holder.innerHTML = html.trim();
        const modal = holder.firstElementChild;
        if (!modal) return;
        document.body.appendChild(modal);
        const img = modal.querySelector('img');
        img.addEventListener('error', () => {
            if (img.src === cfg.placeholder) return;
            console.error('Full image failed to load:', img.dataset.src);
            img.src = cfg.placeholder;
        });
        modal.querySelector('.close').addEventListener('click', () => modal.remove());
        modal.addEventListener('click', e => { if (e.target === modal) modal.remove(); });
        attachMagnifier(modal.querySelector('.magnifier-host'));
    }

    grid.addEventListener('click', e => {
        const card = e.target.closest('.fabric-card');
        if (!card) return;
        const index = card.dataset.index;
        if (cfg.live) {
            fetch(`/api/fabric/${index}`)
                .then(r => r.ok ? r.text() : Promise.reject(r.status))
                .then(openDetail)
                .catch(err => console.error('Error loading fabric details:', err));
        } else {
            const tpl = document.getElementById(`detail-${index}`);
            if (tpl) openDetail(tpl.innerHTML);
        }
    });

    // Magnifier lens. Geometry mirrors render::magnifier::Magnifier::lens;
    // the numbers come from MagnifierConfig through cfg.magnifier.
    function attachMagnifier(host) {
        if (!host) return;
        const img = host.querySelector('img');
        const lens = host.querySelector('.magnifier-lens');
        const m = cfg.magnifier;
        const clamp = (v, lo, hi) => Math.min(Math.max(v, lo), Math.max(hi, lo));

        function move(clientX, clientY) {
            const rect = img.getBoundingClientRect();
            const w = rect.width, h = rect.height;
            const x = clientX - rect.left, y = clientY - rect.top;
            if (!(w > 0 && h > 0) || x < 0 || y < 0 || x > w || y > h) {
                lens.hidden = true;
                return;
            }
            const zoom = Math.max(m.zoom, 1);
            const shortSide = Math.min(w, h);
            const size = Math.min(clamp(shortSide * m.lensRatio, m.minLensPx, m.maxLensPx), shortSide);
            const crop = size / zoom;
            const cropX = clamp(x - crop / 2, 0, w - crop);
            const cropY = clamp(y - crop / 2, 0, h - crop);
            lens.hidden = false;
            lens.style.width = `${size}px`;
            lens.style.height = `${size}px`;
            lens.style.left = `${clamp(x - size / 2, 0, w - size)}px`;
            lens.style.top = `${clamp(y - size / 2, 0, h - size)}px`;
            lens.style.backgroundImage = `url("${img.src}")`;
            lens.style.backgroundSize = `${w * zoom}px ${h * zoom}px`;
            lens.style.backgroundPosition = `${-cropX * zoom}px ${-cropY * zoom}px`;
        }

        host.addEventListener('mousemove', e => move(e.clientX, e.clientY));
        host.addEventListener('touchmove', e => {
            const t = e.touches[0];
            if (!t) return;
            e.preventDefault();
            move(t.clientX, t.clientY);
        }, { passive: false });
        host.addEventListener('mouseleave', () => { lens.hidden = true; });
        host.addEventListener('touchend', () => { lens.hidden = true; });
    }

    // Filters
    function updateMultiSelect(ms) {
        const checked = Array.from(ms.querySelectorAll('.multi-select-option input:checked'));
        const label = ms.dataset.label;
        ms.querySelector('.multi-select-toggle').textContent =
            checked.length > 0 ? `${checked.length} ${label} selected` : `Select ${label}`;
        const tags = ms.querySelector('.selected-tags');
        tags.innerHTML = '';
        checked.forEach(cb => {
            const tag = document.createElement('span');
            tag.className = 'selected-tag';
            tag.textContent = cb.value;
            if (cfg.live) {
                const remove = document.createElement('span');
                remove.className = 'remove-tag';
                remove.textContent = '×';
                remove.addEventListener('click', () => {
                    cb.checked = false;
                    updateMultiSelect(ms);
                    refresh();
                });
                tag.appendChild(remove);
            }
            tags.appendChild(tag);
        });
    }

    function query() {
        const params = new URLSearchParams();
        if (search.value) params.append('search', search.value);
        if (rollWidth.value) params.append('roll_width', rollWidth.value);
        document.querySelectorAll('.multi-select').forEach(ms => {
            ms.querySelectorAll('.multi-select-option input:checked')
                .forEach(cb => params.append(ms.dataset.key, cb.value));
        });
        return params.toString();
    }

    function refresh() {
        fetch(`/api/gallery?${query()}`)
            .then(r => r.ok ? r.text() : Promise.reject(r.status))
            .then(html => { grid.innerHTML = html; observeImages(); })
            .catch(err => {
                console.error('Error filtering fabrics:', err);
                grid.innerHTML = '';
                const p = document.createElement('p');
                p.textContent = cfg.errorMessage;
                grid.appendChild(p);
            });
    }

    document.querySelectorAll('.multi-select').forEach(ms => {
        ms.querySelector('.multi-select-toggle').addEventListener('click', () => ms.classList.toggle('open'));
        document.addEventListener('click', e => { if (!ms.contains(e.target)) ms.classList.remove('open'); });
        if (!cfg.live) return;
        ms.querySelectorAll('.multi-select-option input').forEach(cb => {
            cb.addEventListener('change', () => { updateMultiSelect(ms); refresh(); });
        });
        updateMultiSelect(ms);
    });

    if (cfg.live) {
        const debouncedRefresh = debounce(refresh, cfg.debounceMs);
        search.addEventListener('input', debouncedRefresh);
        rollWidth.addEventListener('input', debouncedRefresh);
        reset.addEventListener('click', () => {
            search.value = '';
            rollWidth.value = '';
            document.querySelectorAll('.multi-select').forEach(ms => {
                ms.querySelectorAll('.multi-select-option input').forEach(cb => { cb.checked = false; });
                updateMultiSelect(ms);
            });
            refresh();
        });
    }

    // Filter bar: docked, floating-hidden, floating-visible.
    // Transitions mirror toolbar::FilterBar; keep the two in step.
    let barState = 'docked';
    let shownAt = 0;

    function setBar(next) {
        barState = next;
        controls.classList.toggle('hidden', next === 'floating-hidden');
        controls.classList.toggle('floating', next === 'floating-visible');
        controls.style.top = next === 'floating-visible' ? `${shownAt + 10}px` : '';
        filterBtn.style.display = next === 'floating-hidden' ? 'flex' : 'none';
    }

    window.addEventListener('scroll', debounce(() => {
        const pos = window.scrollY;
        const headerHeight = header.offsetHeight;
        if (barState === 'docked' && pos > headerHeight + controls.offsetHeight) {
            setBar('floating-hidden');
        } else if (barState !== 'docked' && pos <= headerHeight) {
            setBar('docked');
        } else if (barState === 'floating-visible' && Math.abs(pos - shownAt) > cfg.bufferZonePx) {
            setBar('floating-hidden');
        }
    }, 100));

    filterBtn.addEventListener('click', () => {
        if (barState === 'floating-hidden') {
            shownAt = window.scrollY;
            setBar('floating-visible');
        } else {
            setBar('floating-hidden');
        }
    });

    observeImages();
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::test_support::{catalog, sample_rows};

    fn render(mode: PageMode, state: &FilterState) -> String {
        let config = GalleryConfig::default();
        let session = Session::new(catalog(&sample_rows()), &config);
        let page = Page {
            mode,
            options: session.options(),
            state,
            gallery: session.render_gallery(),
            details: vec![(0, session.render_detail(0).unwrap())],
            config: &config,
            generated: "2024-01-01".to_string(),
            summary: "4 of 5 fabrics".to_string(),
        };
        let mut out = Vec::new();
        write(&mut out, &page).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_page_has_fixed_element_ids() {
        let html = render(PageMode::Live, &FilterState::new());
        for id in [
            "fabricGrid", "searchInput", "rollWidthFilter", "resetFilters", "filterControls", "filterBtn",
            "typeFilter", "familyFilter", "colourFilter", "bandWidthFilter", "scheduleFilter", "statusFilter",
        ] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing #{}", id);
        }
    }

    #[test]
    fn test_options_become_checkboxes() {
        let html = render(PageMode::Live, &FilterState::new());
        assert!(html.contains(r#"id="typeFilter-Velvet" value="Velvet""#));
        assert!(html.contains(r#"id="bandWidthFilter-2.5" value="2.5""#));
        assert!(html.contains("Select Band Width"));
    }

    #[test]
    fn test_static_page_reflects_state_and_disables_controls() {
        let state = FilterState::from_query("search=grey&colour=Grey&roll_width=50").unwrap();
        let html = render(PageMode::Static, &state);

        assert!(html.contains(r#"value="grey" disabled"#));
        assert!(html.contains(r#"value="Grey" checked disabled"#));
        assert!(html.contains("1 Colour selected"));
        assert!(html.contains(r#"value="50" disabled"#));
        assert!(html.contains("<template id=\"detail-0\">"));
        assert!(html.contains(r#""live":false"#));
    }

    #[test]
    fn test_script_config_is_embedded() {
        let html = render(PageMode::Live, &FilterState::new());
        assert!(html.contains(r#""debounceMs":300"#));
        assert!(html.contains(r#""live":true"#));
        assert!(html.contains(r#""lazyMarginPx":200.0"#));
    }

    #[test]
    fn test_script_config_carries_magnifier_and_buffer_zone() {
        let html = render(PageMode::Live, &FilterState::new());
        assert!(html.contains(r#""bufferZonePx":200.0"#));
        assert!(html.contains(
            r#""magnifier":{"zoom":2.5,"minLensPx":80.0,"maxLensPx":200.0,"lensRatio":0.3}"#
        ));
    }

    #[test]
    fn test_option_id_slug() {
        assert_eq!(option_id(FilterField::Colour, "Dove  Grey"), "colourFilter-Dove-Grey");
    }

    #[test]
    fn test_error_page_message() {
        let mut out = Vec::new();
        write_error(&mut out).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains(LOAD_FAILED_MESSAGE));
    }
}
