use clap::Parser;
use face_relay::utils::logger;
use face_relay::utils::validation::{validate_path, validate_url};
use face_relay::{RelayClient, RelayError, Submission, SubmissionState, SubmissionUpdate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "swap-client")]
#[command(about = "Submit a face image and a target video to a face-relay server")]
struct Args {
    /// Source image containing the face
    #[arg(long)]
    image: Option<PathBuf>,

    /// Target video (mp4)
    #[arg(long)]
    video: Option<PathBuf>,

    /// Where the relay is served
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:3000")]
    relay_url: String,

    /// Save the resulting video here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let checked = validate_url("relay_url", &args.relay_url).and_then(|_| match &args.output {
        Some(output) => validate_path("output", &output.to_string_lossy()),
        None => Ok(()),
    });
    if let Err(e) = checked {
        fail(&e);
    }

    let (progress, mut updates) = tokio::sync::mpsc::unbounded_channel::<SubmissionUpdate>();
    let printer = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            match update.state {
                SubmissionState::Success { .. } => println!("✅ {}", update.status_message),
                SubmissionState::Failed { .. } => eprintln!("❌ {}", update.status_message),
                _ => println!("⏳ {}", update.status_message),
            }
        }
    });

    let relay = RelayClient::new(&args.relay_url);
    let mut submission = Submission::new(relay.clone()).with_progress(progress);
    if let Some(image) = &args.image {
        submission.choose_image(image);
    }
    if let Some(video) = &args.video {
        submission.choose_video(video);
    }

    let state = submission.submit().await.clone();
    let error = submission.error().unwrap_or_default().to_string();
    // Closing the channel lets the printer drain and finish.
    drop(submission);
    printer.await?;

    match state {
        SubmissionState::Success { result_url } => {
            println!("🎬 {}", result_url);

            if let Some(output) = &args.output {
                match relay.download(&result_url, output).await {
                    Ok(bytes) => println!("📁 Saved {} bytes to {}", bytes, output.display()),
                    Err(e) => fail(&e),
                }
            }
        }
        SubmissionState::Failed { error } => {
            eprintln!("❌ {}", error);
            std::process::exit(2);
        }
        _ => fail(&RelayError::MissingInputError { message: error }),
    }

    Ok(())
}

fn fail(e: &RelayError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
