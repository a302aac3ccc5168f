use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{DeltaClass, MASTERY_RADIUS, NODE_RADIUS, TreeViewerState};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &TreeViewerState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &TreeViewerState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (12.0 / k, 6.0 / k);
	// added edges flow forward, removed ones backward
	let offset = (state.flow_time * 30.0 / k) % (dash + gap);

	// unallocated first so the diff draws on top
	for pass in [false, true] {
		for edge in state.edges.iter() {
			if (edge.class != DeltaClass::Unallocated) != pass {
				continue;
			}
			let width = match edge.class {
				DeltaClass::Unallocated => 1.0 / k,
				_ => 3.0 / k,
			};
			ctx.set_stroke_style_str(edge.class.color());
			ctx.set_line_width(width);
			if edge.class.is_changed() {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
				ctx.set_line_dash_offset(if edge.class == DeltaClass::Added {
					-offset
				} else {
					offset
				});
			} else {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
			ctx.begin_path();
			ctx.move_to(edge.from.0, edge.from.1);
			ctx.line_to(edge.to.0, edge.to.1);
			ctx.stroke();
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &TreeViewerState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t.clamp(0.0, 1.0));
	let k = state.transform.k;

	for (idx, node) in state.nodes.iter().enumerate() {
		let base = if node.mastery {
			MASTERY_RADIUS
		} else {
			NODE_RADIUS
		};
		let hovered = state.hover.node == Some(idx);
		let radius = if hovered { base * (1.0 + 0.35 * t) } else { base };

		if node.class.is_changed() {
			let glow = radius * 1.8;
			if let Ok(gradient) =
				ctx.create_radial_gradient(node.x, node.y, radius * 0.5, node.x, node.y, glow)
			{
				let _ = gradient.add_color_stop(0.0, node.class.color());
				let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
				ctx.begin_path();
				let _ = ctx.arc(node.x, node.y, glow, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.set_global_alpha(0.35);
				ctx.fill();
				ctx.set_global_alpha(1.0);
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.class.color());
		ctx.fill();

		if hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	}
}

fn draw_tooltip(state: &TreeViewerState, ctx: &CanvasRenderingContext2d) {
	let Some(info) = state.hovered_info() else {
		return;
	};
	let (line_height, pad) = (16.0, 8.0);
	let lines: Vec<&str> = info.lines().collect();
	ctx.set_font("13px sans-serif");
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (x, y) = (state.hover.screen_x + 14.0, state.hover.screen_y + 14.0);

	ctx.set_fill_style_str("rgba(10, 10, 20, 0.9)");
	ctx.fill_rect(x, y, width + pad * 2.0, lines.len() as f64 * line_height + pad * 2.0);
	ctx.set_fill_style_str("#e0d6c0");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + pad, y + pad + (i as f64 + 0.8) * line_height);
	}
}
