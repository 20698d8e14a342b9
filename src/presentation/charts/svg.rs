// SVG serialisation of scenes
use std::fmt::Write;

use super::{coord, CHART_HEIGHT, VIEWBOX_WIDTH};
use crate::domain::format::{format_number, format_percent};
use crate::domain::scene::{BarScene, LineScene, ListScene, PieScene, Scene};

const FONT: &str = "font-family=\"monospace\"";
const ROW_HEIGHT: f64 = 24.0;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn open(out: &mut String, min_x: f64, min_y: f64, width: f64, height: f64) {
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\">",
        coord(min_x),
        coord(min_y),
        coord(width),
        coord(height)
    );
}

/// Standalone SVG document for a scene
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::new();
    match scene {
        Scene::Placeholder { message } => {
            open(&mut out, 0.0, 0.0, VIEWBOX_WIDTH, CHART_HEIGHT);
            let _ = write!(
                out,
                "<rect x=\"1\" y=\"1\" width=\"798\" height=\"198\" fill=\"none\" stroke=\"#999\" stroke-width=\"2\" stroke-dasharray=\"6 4\"/>\
                 <text x=\"400\" y=\"104\" text-anchor=\"middle\" {} font-size=\"12\" fill=\"#999\">{}</text>",
                FONT,
                escape(message)
            );
        }
        Scene::Line(line) => line_svg(&mut out, line),
        Scene::Bar(bar) => bar_svg(&mut out, bar),
        Scene::Pie(pie) => pie_svg(&mut out, pie),
        Scene::List(list) => list_svg(&mut out, list),
        Scene::Clock(face) => {
            open(&mut out, 0.0, 0.0, VIEWBOX_WIDTH, CHART_HEIGHT);
            let _ = write!(
                out,
                "<text x=\"400\" y=\"110\" text-anchor=\"middle\" {f} font-size=\"64\" font-weight=\"bold\">{}</text>\
                 <text x=\"400\" y=\"150\" text-anchor=\"middle\" {f} font-size=\"14\" fill=\"#888\">{}</text>",
                escape(&face.time),
                escape(&face.date.to_uppercase()),
                f = FONT
            );
        }
        Scene::Launcher { entries } => {
            let rows = entries.len().div_ceil(4).max(1) as f64;
            open(&mut out, 0.0, 0.0, VIEWBOX_WIDTH, rows * 60.0);
            for (i, entry) in entries.iter().enumerate() {
                let x = (i % 4) as f64 * 200.0;
                let y = (i / 4) as f64 * 60.0;
                let _ = write!(
                    out,
                    "<g data-view=\"{}\"><rect x=\"{}\" y=\"{}\" width=\"190\" height=\"50\" fill=\"none\" stroke=\"#000\" stroke-width=\"2\"/>\
                     <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" {} font-size=\"12\" font-weight=\"bold\">{}</text></g>",
                    escape(entry.view),
                    coord(x + 5.0),
                    coord(y + 5.0),
                    coord(x + 100.0),
                    coord(y + 34.0),
                    FONT,
                    escape(entry.label)
                );
            }
        }
        Scene::Stat(card) => {
            open(&mut out, 0.0, 0.0, VIEWBOX_WIDTH, CHART_HEIGHT);
            let _ = write!(
                out,
                "<text x=\"20\" y=\"50\" {f} font-size=\"12\" fill=\"#888\">{}</text>\
                 <text x=\"20\" y=\"120\" {f} font-size=\"56\" font-weight=\"bold\">{}</text>",
                escape(&card.caption.to_uppercase()),
                escape(&card.value),
                f = FONT
            );
            if let Some(change) = &card.change {
                let _ = write!(
                    out,
                    "<text x=\"20\" y=\"160\" {} font-size=\"14\">{}</text>",
                    FONT,
                    escape(change)
                );
            }
        }
        Scene::NoteCapture { prompt } => {
            open(&mut out, 0.0, 0.0, VIEWBOX_WIDTH, CHART_HEIGHT);
            let _ = write!(
                out,
                "<rect x=\"10\" y=\"10\" width=\"780\" height=\"180\" fill=\"none\" stroke=\"#000\" stroke-width=\"2\"/>\
                 <text x=\"24\" y=\"40\" {} font-size=\"14\" fill=\"#888\">{}</text>",
                FONT,
                escape(prompt)
            );
        }
    }
    out.push_str("</svg>");
    out
}

fn line_svg(out: &mut String, line: &LineScene) {
    open(out, 0.0, 0.0, line.width, line.height);
    out.push_str(
        "<defs><linearGradient id=\"chartGradient\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\
         <stop offset=\"0%\" stop-color=\"#000\" stop-opacity=\"0.1\"/>\
         <stop offset=\"100%\" stop-color=\"#000\" stop-opacity=\"0\"/></linearGradient></defs>",
    );
    for guide in &line.guides {
        let _ = write!(
            out,
            "<line x1=\"40\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"#ccc\" stroke-width=\"1\" stroke-dasharray=\"4 4\"/>\
             <text x=\"35\" y=\"{}\" text-anchor=\"end\" {} font-size=\"10\" fill=\"#999\">{}</text>",
            coord(line.width - 20.0),
            coord(guide.y + 4.0),
            FONT,
            format_number(guide.value.round()),
            y = coord(guide.y)
        );
    }
    let _ = write!(
        out,
        "<path d=\"{}\" fill=\"url(#chartGradient)\"/><path d=\"{}\" fill=\"none\" stroke=\"#000\" stroke-width=\"3\"/>",
        line.area_path, line.path
    );
    for point in &line.points {
        let _ = write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"#fff\" stroke=\"#000\" stroke-width=\"2\"><title>{}: {}</title></circle>",
            coord(point.x),
            coord(point.y),
            escape(&point.label),
            format_number(point.value)
        );
    }
}

fn bar_svg(out: &mut String, bar: &BarScene) {
    open(out, 0.0, 0.0, bar.width, bar.height);
    let _ = write!(
        out,
        "<line x1=\"20\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"#000\" stroke-width=\"2\"/>",
        coord(bar.width - 20.0),
        y = coord(bar.baseline_y)
    );
    for rect in &bar.bars {
        let center = rect.x + rect.width / 2.0;
        let _ = write!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#000\"/>\
             <text x=\"{c}\" y=\"{}\" text-anchor=\"middle\" {f} font-size=\"12\" font-weight=\"bold\">{}</text>\
             <text x=\"{c}\" y=\"{}\" text-anchor=\"middle\" {f} font-size=\"10\" fill=\"#666\">{}</text>",
            coord(rect.x),
            coord(rect.y),
            coord(rect.width),
            coord(rect.height),
            coord(rect.y - 5.0),
            format_number(rect.value),
            coord(bar.height - 5.0),
            escape(&rect.label.to_uppercase()),
            c = coord(center),
            f = FONT
        );
    }
}

fn pie_svg(out: &mut String, pie: &PieScene) {
    // Chart on the left, legend to the right of the circle
    open(out, -105.0, -105.0, 420.0, 210.0);
    out.push_str("<g transform=\"rotate(-90)\">");
    for slice in &pie.slices {
        let _ = write!(
            out,
            "<path d=\"{}\" fill=\"{}\" stroke=\"#888\" stroke-width=\"0.5\"><title>{}: {}</title></path>",
            slice.path,
            slice.fill,
            escape(&slice.label),
            format_percent(slice.fraction * 100.0)
        );
    }
    out.push_str("</g>");
    for (i, slice) in pie.slices.iter().enumerate() {
        let y = -90.0 + i as f64 * 16.0;
        let _ = write!(
            out,
            "<rect x=\"120\" y=\"{}\" width=\"10\" height=\"10\" fill=\"{}\" stroke=\"#888\"/>\
             <text x=\"136\" y=\"{}\" {} font-size=\"9\">{} ({})</text>",
            coord(y),
            slice.fill,
            coord(y + 9.0),
            FONT,
            escape(&slice.label),
            format_percent(slice.fraction * 100.0)
        );
    }
}

fn list_svg(out: &mut String, list: &ListScene) {
    open(out, 0.0, 0.0, VIEWBOX_WIDTH, list.rows.len() as f64 * ROW_HEIGHT + 8.0);
    for (i, row) in list.rows.iter().enumerate() {
        let y = 20.0 + i as f64 * ROW_HEIGHT;
        let marker = match row.checked {
            Some(true) => "[x] ",
            Some(false) => "[ ] ",
            None => "",
        };
        let fill = if row.alert { "#c00" } else { "#000" };
        let _ = write!(
            out,
            "<text x=\"10\" y=\"{}\" {} font-size=\"13\" fill=\"{}\">{}{}</text>",
            coord(y),
            FONT,
            fill,
            marker,
            escape(&row.label)
        );
        if let Some(detail) = &row.detail {
            let _ = write!(
                out,
                "<text x=\"790\" y=\"{}\" text-anchor=\"end\" {} font-size=\"11\" fill=\"{}\">{}</text>",
                coord(y),
                FONT,
                fill,
                escape(detail)
            );
        }
        if let Some(progress) = row.progress {
            let _ = write!(
                out,
                "<rect x=\"10\" y=\"{}\" width=\"{}\" height=\"2\" fill=\"{}\"/>",
                coord(y + 4.0),
                coord(progress.clamp(0.0, 100.0) / 100.0 * 700.0),
                fill
            );
        }
    }
}
