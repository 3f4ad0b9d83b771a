// Per-report view state, run ordering and recurring execution
// Author: Gabriel Demetrios Lafis

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{ReportTransport, RunError, RunOutcome, RunStatus};
use crate::chart::{ChartFamily, ChartMapper, ChartSpec, FamilySelection};
use crate::data::RowSet;
use crate::report::{validate_binding, ParameterBinder, ParameterBinding, ReportDefinition};
use crate::table::TableEngine;

/// Interval between recurring runs unless configured otherwise
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

struct InFlight {
    generation: u64,
    binding: ParameterBinding,
}

struct ViewState {
    binding: ParameterBinding,
    status: RunStatus,
    table: TableEngine,
    has_result: bool,
    last_error: Option<RunError>,
    family: FamilySelection,
    in_flight: Option<InFlight>,
    generation: u64,
    requests_sent: u64,
    closed: bool,
}

struct ViewInner<T> {
    report: ReportDefinition,
    transport: Arc<T>,
    state: Mutex<ViewState>,
}

impl<T: ReportTransport> ViewInner<T> {
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self, binding: ParameterBinding) -> Result<RunOutcome, RunError> {
        if let Err(err) = validate_binding(&self.report.parameters, &binding) {
            let err = RunError::from(err);
            self.lock().last_error = Some(err.clone());
            return Err(err);
        }

        let generation = {
            let mut state = self.lock();
            if state.closed {
                return Ok(RunOutcome::Cancelled);
            }
            if let Some(in_flight) = &state.in_flight {
                if in_flight.binding == binding {
                    debug!("Coalescing run of {} into request #{}", self.report.id, in_flight.generation);
                    return Ok(RunOutcome::Coalesced);
                }
            }

            state.generation += 1;
            state.requests_sent += 1;
            state.in_flight = Some(InFlight {
                generation: state.generation,
                binding: binding.clone(),
            });
            state.binding = binding.clone();
            state.status = RunStatus::Running;
            state.generation
        };

        debug!("Running report {} (request #{})", self.report.id, generation);
        let pending = PendingRun {
            inner: self,
            generation,
            armed: true,
        };
        let result = self.transport.run_report(&self.report.id, &binding).await;
        pending.disarm();

        let mut state = self.lock();
        if state.closed || state.generation != generation {
            debug!("Discarding stale response #{} for {}", generation, self.report.id);
            return Ok(RunOutcome::Stale);
        }

        state.in_flight = None;
        state.status = RunStatus::Idle;

        match result {
            Ok(rows) => {
                let outcome = if rows.is_empty() {
                    info!("Report {} returned no rows", self.report.id);
                    RunOutcome::Empty
                } else {
                    info!("Report {} returned {} rows", self.report.id, rows.len());
                    RunOutcome::Rows(rows.len())
                };
                state.table.set_rows(rows);
                state.has_result = true;
                state.last_error = None;
                Ok(outcome)
            }
            Err(err) => {
                warn!("Report {} failed: {}", self.report.id, err);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Invalidate whatever is in flight
    fn cancel_pending(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.in_flight = None;
        state.status = RunStatus::Idle;
    }
}

/// Releases the in-flight slot when a run future is dropped before its
/// response arrives. A newer request or a cancellation owns the slot by then.
struct PendingRun<'a, T: ReportTransport> {
    inner: &'a ViewInner<T>,
    generation: u64,
    armed: bool,
}

impl<T: ReportTransport> PendingRun<'_, T> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<T: ReportTransport> Drop for PendingRun<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.inner.lock();
        if state.generation == self.generation {
            debug!("Run #{} of {} dropped before its response", self.generation, self.inner.report.id);
            state.in_flight = None;
            state.status = RunStatus::Idle;
        }
    }
}

/// One opened report.
///
/// The view owns the binding, the latest rows with their table state, the
/// chart family and the recurring-run timer. Responses are applied in
/// request order: a response that completes after a newer request or a
/// cancellation is dropped.
pub struct ReportView<T: ReportTransport + 'static> {
    inner: Arc<ViewInner<T>>,
    poll_interval: Duration,
    poll_task: Option<JoinHandle<()>>,
}

impl<T: ReportTransport + 'static> ReportView<T> {
    /// Open a view with defaults bound by `binder`, overlaid with `cached`
    pub fn open(
        report: ReportDefinition,
        transport: Arc<T>,
        binder: &ParameterBinder,
        cached: &ParameterBinding,
    ) -> Self {
        let binding = binder.bind(&report.parameters, cached);
        let family = FamilySelection::for_report(&report.id);
        info!("Opened report view {} (chart: {})", report.id, family.family());

        let state = ViewState {
            binding,
            status: RunStatus::Idle,
            table: TableEngine::default(),
            has_result: false,
            last_error: None,
            family,
            in_flight: None,
            generation: 0,
            requests_sent: 0,
            closed: false,
        };

        ReportView {
            inner: Arc::new(ViewInner {
                report,
                transport,
                state: Mutex::new(state),
            }),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_task: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn report(&self) -> &ReportDefinition {
        &self.inner.report
    }

    // Parameters

    pub fn binding(&self) -> ParameterBinding {
        self.inner.lock().binding.clone()
    }

    pub fn set_parameter(&self, name: &str, value: &str) {
        self.inner.lock().binding.insert(name.to_string(), value.to_string());
    }

    /// Discard edits and re-apply the defaults
    pub fn reset_parameters(&self, binder: &ParameterBinder) {
        let binding = binder.reset(&self.inner.report.parameters);
        self.inner.lock().binding = binding;
    }

    // Execution

    /// Execute with an explicit binding, which becomes the last-used one
    pub async fn run(&self, binding: ParameterBinding) -> Result<RunOutcome, RunError> {
        self.inner.run(binding).await
    }

    /// Execute with the current binding
    pub async fn run_now(&self) -> Result<RunOutcome, RunError> {
        let binding = self.binding();
        self.inner.run(binding).await
    }

    pub fn status(&self) -> RunStatus {
        self.inner.lock().status
    }

    pub fn last_error(&self) -> Option<RunError> {
        self.inner.lock().last_error.clone()
    }

    /// Number of requests actually sent to the backend
    pub fn requests_sent(&self) -> u64 {
        self.inner.lock().requests_sent
    }

    /// Latest applied rows, `None` before the first successful run
    pub fn rows(&self) -> Option<RowSet> {
        let state = self.inner.lock();
        state.has_result.then(|| state.table.rows().clone())
    }

    /// Work with the table state of the latest rows
    pub fn with_table<R>(&self, f: impl FnOnce(&mut TableEngine) -> R) -> R {
        f(&mut self.inner.lock().table)
    }

    // Chart

    pub fn chart_family(&self) -> ChartFamily {
        self.inner.lock().family.family()
    }

    pub fn select_chart_family(&self, family: ChartFamily) {
        self.inner.lock().family.select(family);
    }

    /// Chart of the latest rows in the selected family
    pub fn chart(&self) -> Option<ChartSpec> {
        let state = self.inner.lock();
        if !state.has_result {
            return None;
        }
        ChartMapper::new().map(state.table.rows(), state.family.family())
    }

    // Recurring execution

    pub fn is_polling(&self) -> bool {
        self.poll_task.is_some()
    }

    /// Switch recurring execution on or off and return the new state.
    ///
    /// Switching on runs once immediately, then every interval with the
    /// last-used binding. Switching off stops the timer and drops any
    /// response still in flight. Must be called within a tokio runtime.
    pub fn toggle_polling(&mut self) -> bool {
        if self.poll_task.is_some() {
            self.stop_polling();
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let interval = self.poll_interval;
        info!("Polling {} every {:?}", inner.report.id, interval);

        self.poll_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let binding = inner.lock().binding.clone();
                match inner.run(binding).await {
                    Ok(outcome) => debug!("Scheduled run of {}: {:?}", inner.report.id, outcome),
                    Err(err) => warn!("Scheduled run of {} failed: {}", inner.report.id, err),
                }
            }
        }));

        true
    }

    fn stop_polling(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
            self.inner.cancel_pending();
            info!("Stopped polling {}", self.inner.report.id);
        }
    }

    /// Leave the view: stop the timer and ignore every pending response
    pub fn close(&mut self) {
        self.stop_polling();
        self.inner.cancel_pending();
        self.inner.lock().closed = true;
    }
}

impl<T: ReportTransport + 'static> Drop for ReportView<T> {
    fn drop(&mut self) {
        self.close();
    }
}
