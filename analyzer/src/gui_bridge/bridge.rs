use crate::generator::profile::{build_lap_records, GeneratorConfig};
use crate::gui_bridge::model::ComparisonModel;
use crate::workflow::runner::Runner;
use anyhow::{anyhow, Result};
use cornercore::lap::TelemetryRecord;
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::{runtime::Builder, task};
use warp::{http::StatusCode, Filter};

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Two raw laps posted by the UI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareRequest {
    #[serde(default = "default_label_a")]
    label_a: String,
    #[serde(default = "default_label_b")]
    label_b: String,
    lap_a: Vec<TelemetryRecord>,
    lap_b: Vec<TelemetryRecord>,
}

/// Two generator configurations posted by the UI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyntheticRequest {
    #[serde(default = "default_label_a")]
    label_a: String,
    #[serde(default = "default_label_b")]
    label_b: String,
    lap_a: GeneratorConfig,
    lap_b: GeneratorConfig,
}

fn default_label_a() -> String {
    "A".into()
}

fn default_label_b() -> String {
    "B".into()
}

type SharedModel = Arc<RwLock<ComparisonModel>>;

fn store(state: &SharedModel, model: ComparisonModel) -> Result<()> {
    let mut guard = state
        .write()
        .map_err(|_| anyhow!("comparison state lock poisoned"))?;
    *guard = model;
    Ok(())
}

fn compare_and_store(
    state: &SharedModel,
    runner: &Runner,
    label_a: &str,
    label_b: &str,
    lap_a: &[TelemetryRecord],
    lap_b: &[TelemetryRecord],
) -> Result<ComparisonModel> {
    let result = runner.execute_records(lap_a, lap_b)?;
    let model = ComparisonModel::new(label_a, label_b, &result);
    store(state, model.clone())?;
    Ok(model)
}

/// Runs a comparison on the blocking pool so the bridge keeps serving while it works.
async fn run_blocking<F>(job: F) -> Result<ComparisonModel>
where
    F: FnOnce() -> Result<ComparisonModel> + Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(|err| anyhow!("comparison task failed: {}", err))?
}

fn accepted(model: &ComparisonModel) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({
            "status": "ok",
            "matched": model.matched(),
            "notes": model.notes,
        })),
        StatusCode::OK,
    )
}

/// Bridge that hosts the comparison HTTP endpoint and processes incoming laps.
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state: SharedModel = Arc::new(RwLock::new(ComparisonModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("comparison")
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(|state: SharedModel| async move {
                match state.read() {
                    Ok(guard) => Ok(warp::reply::json(&*guard)),
                    Err(_) => Err(warp::reject::custom(WarpError)),
                }
            });

        let post_route = warp::path("compare")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |request: CompareRequest, state: SharedModel, runner: Arc<Runner>| async move {
                    let outcome = run_blocking(move || {
                        compare_and_store(
                            &state,
                            &runner,
                            &request.label_a,
                            &request.label_b,
                            &request.lap_a,
                            &request.lap_b,
                        )
                    })
                    .await;
                    match outcome {
                        Ok(model) => Ok::<_, warp::Rejection>(accepted(&model)),
                        Err(err) => {
                            error!("compare error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let generator_route = warp::path("compare-synthetic")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |request: SyntheticRequest, state: SharedModel, runner: Arc<Runner>| async move {
                    let description = request.lap_a.description.clone();
                    let outcome = run_blocking(move || {
                        let lap_a = build_lap_records(&request.lap_a)?;
                        let lap_b = build_lap_records(&request.lap_b)?;
                        compare_and_store(
                            &state,
                            &runner,
                            &request.label_a,
                            &request.label_b,
                            &lap_a,
                            &lap_b,
                        )
                    })
                    .await;
                    match outcome {
                        Ok(model) => {
                            if let Some(description) = description.as_ref() {
                                info!("[GUI] {} -> {} matched", description, model.matched());
                            }
                            Ok::<_, warp::Rejection>(accepted(&model))
                        }
                        Err(err) => {
                            error!("compare-synthetic error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(post_route).or(generator_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &ComparisonModel) -> Result<()> {
        store(&self.state, model.clone())?;
        info!(
            "[GUI] {} vs {}: {} grid points, {} matched corners",
            model.lap_a.label,
            model.lap_b.label,
            model.lap_a.distance.len(),
            model.matched()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> ComparisonModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;

    #[test]
    fn gui_bridge_updates_state() {
        let runner = Arc::new(Runner::new(WorkflowConfig::default()).unwrap());
        let gui = GuiBridge::new(runner.clone());
        let base = GeneratorConfig::default();
        let records = build_lap_records(&base).unwrap();
        let result = runner.execute_records(&records, &records).unwrap();
        let model = ComparisonModel::new("VER", "VER", &result);

        gui.publish(&model).unwrap();
        assert_eq!(gui.snapshot().matched(), base.corners.len());
        assert_eq!(gui.snapshot().lap_a.label, "VER");
    }

    #[tokio::test]
    async fn blocking_comparison_lands_in_shared_state() {
        let runner = Arc::new(Runner::new(WorkflowConfig::default()).unwrap());
        let state: SharedModel = Arc::new(RwLock::new(ComparisonModel::default()));
        let base = GeneratorConfig::default();
        let records = build_lap_records(&base).unwrap();

        let shared = state.clone();
        let model = run_blocking(move || {
            compare_and_store(&shared, &runner, "VER", "NOR", &records, &records)
        })
        .await
        .unwrap();

        assert_eq!(model.matched(), base.corners.len());
        assert_eq!(state.read().unwrap().lap_b.label, "NOR");
    }

    #[test]
    fn compare_request_accepts_camel_case_payload() {
        let request: CompareRequest = serde_json::from_value(json!({
            "labelA": "LEC",
            "lapA": [{"Distance": 0.0, "Speed": 100.0}],
            "lapB": []
        }))
        .unwrap();
        assert_eq!(request.label_a, "LEC");
        assert_eq!(request.label_b, "B");
        assert_eq!(request.lap_a.len(), 1);
    }
}
