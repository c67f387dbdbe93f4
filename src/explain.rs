//! Natural-language explanations of calculator results.
//!
//! The numeric report is always computed first. The explanation is requested
//! afterwards on a worker thread and awaited for at most the configured
//! timeout, after which the worker is cancelled. A failing, slow or panicking
//! explainer only replaces the explanation text with a fallback message.

use std::io::{ErrorKind, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use serde::Serialize;

use crate::config::CalcConfig;
use crate::error::{CalcError, Result};
use crate::report::Report;
use crate::request::Fields;
use crate::scenarios::{Response, Scenario};

/// Prefix of the text returned in place of a failed explanation
pub const FALLBACK_PREFIX: &str = "AI explanation could not be generated";

/// How often a running explanation command is checked for exit or cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Time a cancelled worker gets to stop its work before the caller moves on
const CANCEL_GRACE: Duration = Duration::from_millis(500);

/// Tells a worker that nobody is waiting for its result any more
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Receiver<()>,
}

/// Owning side of a [`CancelToken`]; cancels when consumed or dropped
#[derive(Debug)]
pub struct CancelHandle {
    tx: Sender<()>,
}

/// Create a connected handle/token pair
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = bounded(0);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(self) {
        drop(self.tx);
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        !matches!(self.rx.try_recv(), Err(TryRecvError::Empty))
    }

    /// Block for up to `timeout`; `true` as soon as the handle cancels
    pub fn wait(&self, timeout: Duration) -> bool {
        !matches!(self.rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
    }
}

/// Everything an explainer gets to see
#[derive(Debug, Clone, Serialize)]
pub struct ExplainRequest {
    pub scenario: Scenario,
    pub inputs: Fields,
    pub results: Report,
}

impl ExplainRequest {
    /// Prompt for a text-generation service
    pub fn prompt(&self) -> String {
        let inputs = serde_json::to_string_pretty(&self.inputs).unwrap_or_default();
        let mut prompt = format!(
            "You are an expert in wireless and mobile communications. \
             A user ran the \"{}\" calculator.\n\nInputs:\n{}\n\nResults:\n",
            self.scenario.title(),
            inputs
        );
        for (label, value) in self.results.iter() {
            prompt.push_str(&format!("- {}: {}\n", label, value));
        }
        prompt.push_str(
            "\nExplain step by step how each result follows from the inputs, \
             what it means for the system designer, and any assumption behind it. \
             Keep the explanation concise and use plain paragraphs.",
        );
        prompt
    }
}

/// Text-generation service
///
/// Implementations doing slow work should stop and release what they started
/// once `cancel` fires.
pub trait Explainer: Send + Sync {
    fn explain(&self, request: &ExplainRequest, cancel: &CancelToken) -> Result<String>;
}

/// Offline explainer describing each metric from a fixed glossary
pub struct SummaryExplainer;

impl Explainer for SummaryExplainer {
    fn explain(&self, request: &ExplainRequest, _cancel: &CancelToken) -> Result<String> {
        let mut text = format!(
            "{} results for the given inputs.",
            request.scenario.title()
        );
        for (label, value) in request.results.iter() {
            text.push('\n');
            match describe_metric(label) {
                Some(description) => text.push_str(&format!("{} is {}: {}", label, value, description)),
                None => text.push_str(&format!("{} is {}.", label, value)),
            }
        }
        Ok(text)
    }
}

/// Explainer for deployments without a text-generation service
pub struct NoExplainer;

impl Explainer for NoExplainer {
    fn explain(&self, _request: &ExplainRequest, _cancel: &CancelToken) -> Result<String> {
        Err(CalcError::Explanation(
            "no explanation service configured".to_string(),
        ))
    }
}

/// Explainer that pipes the prompt into an external program and reads the
/// explanation from its standard output
pub struct CommandExplainer {
    program: String,
    args: Vec<String>,
}

impl CommandExplainer {
    /// Build from a `[program, args...]` command line
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CalcError::Config("explain command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Explainer for CommandExplainer {
    fn explain(&self, request: &ExplainRequest, cancel: &CancelToken) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CalcError::Explanation(format!("cannot start {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(request.prompt().as_bytes()) {
                // A program may exit without reading its input
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    reap(&mut child);
                    return Err(CalcError::Explanation(format!("cannot write prompt: {}", e)));
                }
                _ => {}
            }
        }

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    reap(&mut child);
                    return Err(CalcError::Explanation(e.to_string()));
                }
            }
            if cancel.wait(POLL_INTERVAL) {
                log::debug!("Stopping {} (pid {})", self.program, child.id());
                reap(&mut child);
                return Err(CalcError::Explanation(format!("{} was cancelled", self.program)));
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        if !status.success() {
            return Err(CalcError::Explanation(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        let text = stdout.trim().to_string();
        if text.is_empty() {
            return Err(CalcError::Explanation(format!(
                "{} produced no output",
                self.program
            )));
        }
        Ok(text)
    }
}

/// Kill `child` and collect its exit status
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("kill({}) failed: {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        log::debug!("wait({}) failed: {}", child.id(), e);
    }
}

/// Read a child pipe to the end on its own thread so the child never blocks
/// on a full pipe
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Explainer selected by the configuration: external command when one is
/// set, offline summary otherwise
pub fn explainer_from_config(config: &CalcConfig) -> Result<Arc<dyn Explainer>> {
    if config.explain.command.is_empty() {
        Ok(Arc::new(SummaryExplainer))
    } else {
        Ok(Arc::new(CommandExplainer::new(&config.explain.command)?))
    }
}

fn fallback(reason: impl std::fmt::Display) -> String {
    format!("{}: {}", FALLBACK_PREFIX, reason)
}

/// Ask `explainer` for an explanation, waiting at most `timeout`
///
/// Never fails: every failure is turned into a fallback message. A worker
/// that overruns the timeout is cancelled and given a short grace period to
/// stop whatever it started.
pub fn explain_with_timeout(
    explainer: Arc<dyn Explainer>,
    request: ExplainRequest,
    timeout: Duration,
) -> String {
    let (tx, rx) = bounded(1);
    let (handle, token) = cancellation();
    let spawned = thread::Builder::new()
        .name("explainer".to_string())
        .spawn(move || {
            // Receiver is gone once the caller has given up
            let _ = tx.send(explainer.explain(&request, &token));
        });
    if let Err(e) = spawned {
        log::warn!("Could not start explanation worker: {}", e);
        return fallback(e);
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            log::warn!("Explanation failed: {}", e);
            fallback(e)
        }
        Err(RecvTimeoutError::Timeout) => {
            log::warn!("Explanation timed out after {} ms", timeout.as_millis());
            handle.cancel();
            if rx.recv_timeout(CANCEL_GRACE).is_err() {
                log::warn!("Explanation worker still running after cancellation");
            }
            fallback(format!("timed out after {} ms", timeout.as_millis()))
        }
        Err(RecvTimeoutError::Disconnected) => {
            log::warn!("Explanation worker stopped without a result");
            fallback("explanation worker stopped")
        }
    }
}

/// Numeric results paired with their explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub numerical_results: Report,
    pub ai_explanation: String,
}

/// Explained calculator output, or the calculator's error record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Analysis(Analysis),
    Error { error: String },
}

/// Compute `scenario` and, when it succeeds, explain the result
pub fn analyze(
    scenario: Scenario,
    fields: &Fields,
    config: &CalcConfig,
    explainer: Arc<dyn Explainer>,
) -> AnalysisResponse {
    match scenario.compute(fields, config) {
        Response::Metrics(report) => {
            let request = ExplainRequest {
                scenario,
                inputs: fields.clone(),
                results: report.clone(),
            };
            let ai_explanation = explain_with_timeout(explainer, request, config.explain.timeout());
            AnalysisResponse::Analysis(Analysis {
                numerical_results: report,
                ai_explanation,
            })
        }
        Response::Error { error } => AnalysisResponse::Error { error },
    }
}

fn describe_metric(label: &str) -> Option<&'static str> {
    let description = match label {
        "Sampler Rate" => "Nyquist sampling takes two samples per hertz of bandwidth.",
        "Quantizer Rate" => "each sample is represented with the configured number of bits.",
        "Source Encoder Rate" => "compression scales the rate by the source coder ratio.",
        "Channel Encoder Rate" => "error-control coding adds redundancy, dividing the rate by the code rate.",
        "Interleaver Output Rate" => "interleaving reorders bits and leaves the rate unchanged.",
        "Burst Duration" => "the air time of one burst at the channel-coded rate.",
        "Bits per Symbol" => "log2 of the modulation order.",
        "Subcarriers per RB" => "resource block bandwidth divided by subcarrier spacing.",
        "Bits per RB" => "bits per symbol times subcarriers times symbols in one block.",
        "Maximum Data Rate" => "all parallel blocks delivered once per block duration.",
        "Total Bandwidth" => "parallel blocks times the bandwidth of one block.",
        "Spectral Efficiency" => "data rate delivered per hertz of occupied bandwidth.",
        "Thermal Noise" => "kTB noise power from system temperature and data rate.",
        "Receiver Sensitivity" => "noise floor raised by the noise figure and required Eb/N0.",
        "Required Receiver Power" => "sensitivity plus the fade margin, expressed in dBm.",
        "Required Transmitted Power" => "receive power plus path and other losses, less both antenna gains.",
        "Number of Cells" => "hexagonal cells needed to cover the service area.",
        "Traffic per Cell" => "busy-hour subscriber traffic shared evenly between cells.",
        "Channels per Cell (GoS)" => "smallest trunk group meeting the blocking target under Erlang-B.",
        "Required Cluster Size (N)" => "smallest reuse cluster meeting the SIR with six co-channel interferers.",
        _ => return None,
    };
    Some(description)
}
