mod logging;
mod renderer;

use std::fs::File;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use rig_monitor_core::parsers::{RecordReader, ScanDecoder, ScanStream};
use rig_monitor_core::sources::{FrameSource, ImageSequenceSource, RecordingPaths};
use rig_monitor_core::views::scan::ScanView;
use rig_monitor_core::{
    Canvas, Dispatch, InputDispatcher, MonitorConfig, MonitoringCompositor, SharedState, StreamEnd,
    StreamSynchronizer, SyncError,
};
use tracing::{error, info, warn};

use crate::renderer::{TerminalDisplay, TerminalKeys};

/// How long to block on readiness between key polls while streams start up.
const READY_POLL: Duration = Duration::from_millis(50);

type Producer = JoinHandle<Result<StreamEnd, SyncError>>;

/// Why the render loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Shutdown,
    /// The stream thread finished before every channel had delivered once.
    NeverReady,
}

#[derive(Parser)]
#[command(name = "rig-monitor", version, about = "Monitoring canvas for vehicle test rig recordings")]
struct Cli {
    /// Configuration file (defaults to ./rig-monitor.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play back a recording on the monitoring canvas.
    Replay {
        /// Recording base name shared by all channels.
        base: String,
        /// Overrides `recording.data_root`.
        #[arg(long)]
        data_root: Option<PathBuf>,
    },
    /// Decode every record of a scan file and print one JSON line per record.
    Scan {
        file: PathBuf,
        /// Stop after this many records.
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::load_from(path),
        None => MonitorConfig::load(),
    }
    .context("loading configuration")?;
    logging::init(&config.log)?;

    match cli.command {
        Command::Replay { base, data_root } => {
            if let Some(root) = data_root {
                config.recording.data_root = root;
            }
            replay(&config, &base)
        }
        Command::Scan { file, limit } => dump_scan(&config, &file, limit),
    }
}

fn open_camera(dir: &Path) -> Result<Box<dyn FrameSource>> {
    let source = ImageSequenceSource::open(dir)
        .with_context(|| format!("opening camera channel {}", dir.display()))?;
    Ok(Box::new(source))
}

fn open_scan(config: &MonitorConfig, path: &Path) -> Result<RecordReader<File>> {
    let file = File::open(path).with_context(|| format!("opening scan channel {}", path.display()))?;
    Ok(RecordReader::with_options(
        file,
        config.scan.chunk_size,
        config.scan.terminator,
    ))
}

fn replay(config: &MonitorConfig, base: &str) -> Result<()> {
    let paths = RecordingPaths::new(&config.recording.data_root, base, &config.recording.channels);
    info!(?paths, "starting replay");

    let mut sync = StreamSynchronizer::new(
        open_camera(&paths.left)?,
        open_camera(&paths.right)?,
        open_camera(&paths.mid)?,
        open_scan(config, &paths.scan)?,
    )
    .with_frame_interval(config.display.frame_interval());

    let state = SharedState::new();
    let producer = thread::Builder::new()
        .name("stream-sync".into())
        .spawn({
            let state = Arc::clone(&state);
            move || sync.run(&state)
        })
        .context("spawning stream thread")?;

    let mut display = match TerminalDisplay::open() {
        Ok(display) => display,
        Err(e) => return finish_replay(&state, producer, Err(e), Ok(Exit::Shutdown)),
    };
    let exit = render_loop(&mut display, &state, config);
    let closed = display.close();
    finish_replay(&state, producer, closed, exit)
}

/// Stop and join the stream thread, then report the terminal and render
/// results in that order.
fn finish_replay(state: &SharedState, producer: Producer, closed: Result<()>, exit: Result<Exit>) -> Result<()> {
    state.request_stop();
    let end = join_producer(producer);
    closed?;
    if exit? == Exit::NeverReady {
        bail!("streams ended before every channel delivered a first frame ({:?})", end?);
    }
    end?;
    Ok(())
}

fn join_producer(producer: Producer) -> Result<StreamEnd> {
    match producer.join() {
        Ok(Ok(end)) => {
            info!(?end, "stream thread finished");
            Ok(end)
        }
        Ok(Err(e)) => {
            warn!(channel = %e.channel(), error = %e, "stream thread failed");
            Err(e).context("stream thread failed")
        }
        Err(_) => {
            error!("stream thread panicked");
            Err(anyhow!("stream thread panicked"))
        }
    }
}

/// Compose, draw and poll the keyboard until shutdown.
fn render_loop(display: &mut TerminalDisplay, state: &SharedState, config: &MonitorConfig) -> Result<Exit> {
    let mut dispatcher = InputDispatcher::new(TerminalKeys, config.display.key_poll());
    let mut scan_view = ScanView::new(ScanDecoder::new(config.scan.radius));
    let waiting = Canvas::blank();
    while !state.wait_ready(READY_POLL) {
        if state.streams_finished() && !state.is_ready() {
            warn!("stream thread finished before all channels delivered");
            return Ok(Exit::NeverReady);
        }
        display.draw(&waiting, scan_view.panel(), "waiting for streams")?;
        if state.stop_requested() || dispatcher.poll(state)? == Dispatch::Shutdown {
            return Ok(Exit::Shutdown);
        }
    }
    info!("all channels delivered, rendering");

    let mut compositor = MonitoringCompositor::new();
    while !state.stop_requested() {
        let frames = state.frames();
        let composition = compositor.render(frames.as_deref(), state);
        scan_view.refresh(state.scan_record());
        let mut header = match &frames {
            Some(f) => format!("cycle {}", f.cycle),
            None => "no frames".to_string(),
        };
        if scan_view.skipped() > 0 {
            header.push_str(&format!(" | {} scans skipped", scan_view.skipped()));
        }
        if state.streams_finished() {
            header.push_str(" | stream ended");
        }
        display.draw(composition.canvas(), scan_view.panel(), &header)?;
        if dispatcher.poll(state)? == Dispatch::Shutdown {
            break;
        }
    }
    Ok(Exit::Shutdown)
}

fn dump_scan(config: &MonitorConfig, file: &Path, limit: Option<usize>) -> Result<()> {
    let stream = ScanStream::new(open_scan(config, file)?, ScanDecoder::new(config.scan.radius));
    let mut out = stdout().lock();
    let (mut decoded, mut skipped) = (0usize, 0usize);

    for item in stream.take(limit.unwrap_or(usize::MAX)) {
        let record = item.context("reading scan file")?;
        match record.scan {
            Ok(scan) => {
                let line = serde_json::json!({
                    "offset": record.offset,
                    "valid": scan.valid_count(),
                    "scan": scan,
                });
                serde_json::to_writer(&mut out, &line)?;
                writeln!(out)?;
                decoded += 1;
            }
            Err(e) => {
                warn!(offset = record.offset, error = %e, "skipping undecodable record");
                skipped += 1;
            }
        }
    }
    out.flush()?;
    eprintln!("{decoded} records decoded, {skipped} skipped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use rig_monitor_core::model::ChannelId;

    fn idle_producer(state: &Arc<SharedState>, joined: &Arc<AtomicBool>) -> Producer {
        let state = Arc::clone(state);
        let joined = Arc::clone(joined);
        thread::spawn(move || {
            while !state.stop_requested() {
                thread::sleep(Duration::from_millis(1));
            }
            joined.store(true, Ordering::SeqCst);
            Ok(StreamEnd::Stopped { cycles: 0 })
        })
    }

    #[test]
    fn terminal_error_still_stops_and_joins_the_stream_thread() {
        let state = SharedState::new();
        let joined = Arc::new(AtomicBool::new(false));
        let producer = idle_producer(&state, &joined);

        let err = finish_replay(&state, producer, Err(anyhow!("tty gone")), Ok(Exit::Shutdown)).unwrap_err();
        assert_eq!(err.to_string(), "tty gone");
        assert!(state.stop_requested());
        assert!(joined.load(Ordering::SeqCst));
    }

    #[test]
    fn never_ready_reports_how_the_streams_ended() {
        let state = SharedState::new();
        let producer: Producer = thread::spawn(|| {
            Ok(StreamEnd::Exhausted {
                channel: ChannelId::Left,
                cycles: 4,
            })
        });

        let err = finish_replay(&state, producer, Ok(()), Ok(Exit::NeverReady)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("before every channel"), "{message}");
        assert!(message.contains("Exhausted"), "{message}");
    }

    #[test]
    fn clean_shutdown_is_ok() {
        let state = SharedState::new();
        let joined = Arc::new(AtomicBool::new(false));
        let producer = idle_producer(&state, &joined);
        assert!(finish_replay(&state, producer, Ok(()), Ok(Exit::Shutdown)).is_ok());
        assert!(joined.load(Ordering::SeqCst));
    }
}

