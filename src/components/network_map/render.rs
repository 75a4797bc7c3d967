use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

use super::tick::{Frame, LinkPaint, NodePaint};
use super::types::{LinkType, NodeRole};

const BACKGROUND: &str = "#ffffff";
const LABEL_COLOR: &str = "#495057";

fn link_color(link_type: LinkType) -> &'static str {
	match link_type {
		LinkType::BrokenLink => "#dc3545",
		LinkType::Router2Router => "#0d6efd",
		LinkType::Coordinator2Router => "#6f42c1",
		LinkType::Coordinator2EndDevice | LinkType::EndDevice2Router => "#198754",
		LinkType::Other => "#adb5bd",
	}
}

fn node_color(role: NodeRole) -> &'static str {
	match role {
		NodeRole::Coordinator => "#e83e8c",
		NodeRole::Router => "#fd7e14",
		NodeRole::EndDevice => "#20c997",
		NodeRole::Unknown => "#6c757d",
	}
}

/// Paint one frame. The frame is already in screen space.
pub fn paint(frame: &Frame, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	for link in &frame.links {
		draw_link(link, ctx);
	}
	for node in &frame.nodes {
		draw_node(node, frame.icon_half, ctx);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_link(link: &LinkPaint, ctx: &CanvasRenderingContext2d) {
	let Ok(path) = Path2d::new_with_path_string(&link.path()) else {
		return;
	};
	ctx.set_global_alpha(link.opacity);
	ctx.set_stroke_style_str(link_color(link.link_type));
	ctx.set_line_width(1.5);
	if link.link_type == LinkType::BrokenLink {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0),
			&JsValue::from_f64(4.0),
		));
	}
	ctx.stroke_with_path(&path);
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if let Some(label) = &link.label {
		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font("10px sans-serif");
		let _ = ctx.fill_text(label, link.label_at.x, link.label_at.y);
	}
}

fn draw_node(node: &NodePaint, half: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.center.x, node.center.y);
	ctx.set_global_alpha(node.opacity);
	ctx.set_fill_style_str(node_color(node.role));
	ctx.begin_path();
	match node.role {
		NodeRole::Coordinator => {
			for i in 0..6 {
				let a = PI / 3.0 * i as f64 - PI / 2.0;
				let (px, py) = (x + half * a.cos(), y + half * a.sin());
				if i == 0 {
					ctx.move_to(px, py);
				} else {
					ctx.line_to(px, py);
				}
			}
			ctx.close_path();
		}
		NodeRole::Router => {
			let _ = ctx.arc(x, y, half * 0.8, 0.0, 2.0 * PI);
		}
		NodeRole::EndDevice | NodeRole::Unknown => {
			let _ = ctx.arc(x, y, half * 0.5, 0.0, 2.0 * PI);
		}
	}
	ctx.fill();

	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("11px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&node.name, x, node.origin.y + 2.0 * half + 12.0);
	ctx.set_text_align("start");
}
