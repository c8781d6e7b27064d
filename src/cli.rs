//! CLI channel — stdin/stdout intake session for local use.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::assessment::{FrtChannel, PoseAssessor};
use crate::error::Result;
use crate::intake::{DialogEngine, Prompt};
use crate::upload::VideoStore;

const CHOOSE_CHANNEL: &str = "Please choose 'upload' or 'live':";
const ASK_VIDEO_PATH: &str = "Please enter the path to your video file:";

/// Where the REPL is after the intake itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Intake,
    ChooseChannel,
    AwaitVideoPath,
}

/// Runs one intake over line-oriented input and output.
pub struct CliSession {
    engine: DialogEngine,
    videos: VideoStore,
    assessor: Arc<dyn PoseAssessor>,
}

impl CliSession {
    pub fn new(engine: DialogEngine, videos: VideoStore, assessor: Arc<dyn PoseAssessor>) -> Self {
        Self {
            engine,
            videos,
            assessor,
        }
    }

    pub fn engine(&self) -> &DialogEngine {
        &self.engine
    }

    /// Run on the process's stdin/stdout.
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Drive the conversation until it finishes or input ends.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut phase = Phase::Intake;

        let welcome = self.engine.handle_message("");
        write_prompt(&mut output, &welcome).await?;

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            phase = match phase {
                Phase::Intake => {
                    let prompt = self.engine.handle_message(line);
                    write_prompt(&mut output, &prompt).await?;
                    match self.engine.state().frt_recommended() {
                        Some(true) => Phase::ChooseChannel,
                        Some(false) => break,
                        None => Phase::Intake,
                    }
                }
                Phase::ChooseChannel => match FrtChannel::parse(line) {
                    Some(FrtChannel::Upload) => {
                        write_line(&mut output, ASK_VIDEO_PATH).await?;
                        Phase::AwaitVideoPath
                    }
                    Some(FrtChannel::Live) => match self.assessor.assess_live().await {
                        Ok(report) => {
                            write_line(&mut output, &report.summary).await?;
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Live assessment failed");
                            write_line(&mut output, &format!("{e}\n{CHOOSE_CHANNEL}")).await?;
                            Phase::ChooseChannel
                        }
                    },
                    None => {
                        write_line(&mut output, CHOOSE_CHANNEL).await?;
                        Phase::ChooseChannel
                    }
                },
                Phase::AwaitVideoPath => {
                    if self.assess_upload(Path::new(line), &mut output).await? {
                        break;
                    }
                    Phase::AwaitVideoPath
                }
            };
        }

        output.flush().await?;
        Ok(())
    }

    /// Store and assess a recording. Returns false if the user should retry.
    async fn assess_upload<W>(&self, source: &Path, output: &mut W) -> Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        let stored = match self.videos.store_file(source).await {
            Ok(stored) => stored,
            Err(e) => {
                write_line(output, &format!("{e}\n{ASK_VIDEO_PATH}")).await?;
                return Ok(false);
            }
        };

        match self.assessor.assess_recording(&stored.path).await {
            Ok(report) => {
                write_line(output, &report.summary).await?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!(filename = %stored.filename, error = %e, "Assessment failed");
                write_line(output, &format!("{e}\n{ASK_VIDEO_PATH}")).await?;
                Ok(false)
            }
        }
    }
}

async fn write_prompt<W: AsyncWrite + Unpin>(output: &mut W, prompt: &Prompt) -> Result<()> {
    let mut text = prompt.question.clone();
    if !prompt.options.is_empty() {
        text.push_str(&format!(" [{}]", prompt.options.join("/")));
    }
    write_line(output, &text).await
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
