use std::collections::HashMap;
use std::f64::consts::PI;

use leptos::prelude::*;

use crate::components::tree_viewer::PassiveTreeCanvas;
use crate::tree::{
	Connection, MasteryEffect, PassiveNode, PassiveTree, Result, UrlTree, ViewBox,
	build_url_tree_delta,
};

const RINGS: usize = 4;
const RING_SPACING: f64 = 1500.0;

fn ring_id(ring: usize, slot: usize) -> String {
	format!("{ring}{slot:02}")
}

/// Generate a demo tree of concentric rings, each spoke-linked to the ring
/// inside it, with one mastery node per ring.
fn generate_sample_tree() -> PassiveTree {
	let mut nodes = HashMap::new();
	let mut connections = Vec::new();
	let mut mastery_effects = HashMap::new();

	for ring in 1..=RINGS {
		let slots = 6 * ring;
		for slot in 0..slots {
			let angle = slot as f64 * 2.0 * PI / slots as f64;
			let radius = ring as f64 * RING_SPACING;
			nodes.insert(
				ring_id(ring, slot),
				PassiveNode {
					x: radius * angle.cos(),
					y: radius * angle.sin(),
					mastery_effects: Vec::new(),
				},
			);
			connections.push(Connection {
				a: ring_id(ring, slot),
				b: ring_id(ring, (slot + 1) % slots),
			});
			if ring > 1 && slot % ring == 0 {
				connections.push(Connection {
					a: ring_id(ring, slot),
					b: ring_id(ring - 1, slot / ring * (ring - 1)),
				});
			}
		}

		let effects: Vec<String> = (0..3).map(|v| format!("m{ring}-{v}")).collect();
		for (v, effect) in effects.iter().enumerate() {
			mastery_effects.insert(
				effect.clone(),
				MasteryEffect {
					stats: vec![
						format!("{}% increased Damage", 10 * (v + 1)),
						format!("+{} to maximum Life", 20 * ring),
					],
				},
			);
		}
		let mastery = format!("M{ring}");
		let angle = PI / 6.0;
		let radius = (ring as f64 - 0.5) * RING_SPACING;
		nodes.insert(
			mastery.clone(),
			PassiveNode {
				x: radius * angle.cos(),
				y: radius * angle.sin(),
				mastery_effects: effects,
			},
		);
		connections.push(Connection {
			a: mastery,
			b: ring_id(ring, ring / 2),
		});
	}

	let extent = (RINGS as f64 + 1.0) * RING_SPACING;
	PassiveTree {
		nodes,
		connections,
		mastery_effects,
		view_box: ViewBox {
			x: -extent,
			y: -extent,
			w: extent * 2.0,
			h: extent * 2.0,
		},
	}
}

fn sample_build(ring_two_slots: std::ops::Range<usize>, mastery_variant: usize) -> UrlTree {
	let mut nodes: Vec<String> = (0..6).map(|slot| ring_id(1, slot)).collect();
	nodes.extend(ring_two_slots.map(|slot| ring_id(2, slot)));
	nodes.push("M2".into());
	UrlTree {
		nodes,
		mastery_lookup: HashMap::from([("M2".to_owned(), format!("m2-{mastery_variant}"))]),
	}
}

/// One line overview of the diff. Integrity errors surface through the
/// page's error boundary.
fn delta_summary(tree: &PassiveTree, current: &UrlTree, previous: &UrlTree) -> Result<String> {
	let delta = build_url_tree_delta(current, previous, tree)?;
	Ok(format!(
		"{} added, {} removed, {} unchanged",
		delta.nodes_added.len(),
		delta.nodes_removed.len(),
		delta.nodes_active.len()
	))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let tree = Signal::derive(generate_sample_tree);
	let builds = RwSignal::new((sample_build(0..5, 0), sample_build(3..9, 1)));
	let previous = Signal::derive(move || builds.get().0);
	let current = Signal::derive(move || builds.get().1);
	let swap = move |_| builds.update(|(prev, cur)| std::mem::swap(prev, cur));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<PassiveTreeCanvas tree=tree current=current previous=previous fullscreen=true />
				<div class="graph-overlay">
					<h1>"Passive Tree Delta"</h1>
					<p class="summary">
						{move || delta_summary(&tree.get(), &current.get(), &previous.get())}
					</p>
					<p class="subtitle">
						"Green nodes were added, red ones removed. Hover a mastery for its effect. Double click to refit."
					</p>
					<button on:click=swap>"Swap builds"</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
