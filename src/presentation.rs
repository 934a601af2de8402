use std::{
    fmt::{self, Write},
    time::Duration,
};

use tokio::time::sleep;

use crate::{filter::Facet, session::DashboardView};

pub trait Presenter {
    fn render(&mut self, view: &DashboardView<'_>) -> fmt::Result;
}

/// Hands a view to the presenter, optionally after a delay so a front end can
/// show its "updating" state.
pub async fn present<P: Presenter>(
    presenter: &mut P,
    view: &DashboardView<'_>,
    delay: Option<Duration>,
) -> fmt::Result {
    if let Some(delay) = delay {
        sleep(delay).await;
    }

    presenter.render(view)
}

/// Renders each chart dataset as plain text.
#[derive(Default)]
pub struct TextPresenter {
    pub output: String,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_view(&mut self, view: &DashboardView<'_>) -> fmt::Result {
        let out = &mut self.output;
        let derived = view.derived;

        if let Some(error) = view.error {
            writeln!(out, "error: {error}")?;
        }

        let active: Vec<String> = view
            .filters
            .active()
            .map(|(facet, value)| format!("{facet}={value}"))
            .collect();
        writeln!(
            out,
            "filters: {}",
            if active.is_empty() { "none".to_string() } else { active.join(", ") }
        )?;

        for facet in Facet::ALL {
            writeln!(out, "{facet} options: {}", view.options.get(facet).len())?;
        }

        let stats = &derived.summary;
        writeln!(out, "records: {}", stats.total)?;
        writeln!(out, "avg intensity: {}", format_mean(stats.mean_intensity))?;
        writeln!(out, "avg relevance: {}", format_mean(stats.mean_relevance))?;
        writeln!(out, "avg likelihood: {}", format_mean(stats.mean_likelihood))?;

        writeln!(out, "intensity:")?;
        for bucket in &derived.by_intensity {
            writeln!(out, "  {:>4} {}", bucket.intensity, bucket.count)?;
        }

        writeln!(out, "regions:")?;
        for slice in &derived.by_region {
            writeln!(out, "  {} {}", slice.name, slice.value)?;
        }

        writeln!(out, "topics:")?;
        for topic in &derived.by_topic {
            writeln!(out, "  {} {}", topic.topic, topic.count)?;
        }

        writeln!(out, "scatter points: {}", derived.scatter_points.len())
    }
}

impl Presenter for TextPresenter {
    fn render(&mut self, view: &DashboardView<'_>) -> fmt::Result {
        self.output.clear();
        self.write_view(view)
    }
}

fn format_mean(mean: f64) -> String {
    if mean.is_nan() {
        "undefined".to_string()
    } else {
        format!("{mean:.2}")
    }
}
