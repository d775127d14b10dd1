//! Skraper - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use skraper::{
    cli::Args,
    config::{validate_config, validate_provider_name, Config, OutputFormat},
    download::{download_all, BatchStats, DownloadOptions, MediaDownloader, MediaResolver},
    error::{exit_codes, Error, Result},
    fs::{export_file, media_directory, output_root},
    media::{ImageSize, Post},
    net::ReqwestClient,
    output::{
        create_spinner, print_banner, print_batch_stats, print_error, print_info, print_outcome,
        print_warning, render_posts, write_export,
    },
    process::FfmpegRunner,
    provider::{FeedSkraper, Skraper, YoutubeResolver},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Http(_) | Error::HttpStatus { .. } | Error::Json(_) => {
                    ExitCode::from(exit_codes::FETCH_ERROR as u8)
                }
                Error::Download { .. } | Error::FFmpeg(_) | Error::FFmpegNotFound => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<u8> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        tracing::warn!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;
    validate_provider_name(&args.provider)?;

    let client = Arc::new(ReqwestClient::new(
        &config.http.user_agent,
        config.download.show_progress,
    )?);
    let skraper = Arc::new(FeedSkraper::new(args.provider.clone(), client.clone()));

    let posts = skraper.get_latest_posts(&args.input, args.limit).await?;
    print_info(&format!("Fetched {} posts from {}", posts.len(), args.input));

    if args.media_only {
        persist_media(&args, &config, client, skraper, &posts).await
    } else {
        persist_meta(&args, &config, &posts)?;
        Ok(exit_codes::SUCCESS as u8)
    }
}

async fn persist_media(
    args: &Args,
    config: &Config,
    client: Arc<ReqwestClient>,
    skraper: Arc<FeedSkraper>,
    posts: &[Post],
) -> Result<u8> {
    let root = output_root(&config.download_directory());
    let target_dir = media_directory(&root, skraper.name(), &args.path)?;

    let runner = FfmpegRunner::new(&config.ffmpeg.program)
        .with_poll_interval(config.ffmpeg.poll_interval())
        .with_check_timeout(config.ffmpeg.check_timeout());
    let youtube = YoutubeResolver::new(&config.youtube.program, config.youtube.timeout());

    let resolver = MediaResolver::new(skraper)
        .with_video_host(Arc::new(youtube))
        .with_max_depth(config.download.max_resolve_depth);
    let downloader =
        MediaDownloader::new(client, resolver, Arc::new(runner)).with_options(DownloadOptions {
            manifest_timeout: config.ffmpeg.timeout(),
            overwrite: config.download.overwrite,
        });

    let spinner = create_spinner(&format!("Downloading into {}", target_dir.display()));
    let outcomes = download_all(
        &downloader,
        posts,
        &target_dir,
        config.download.parallel_downloads,
    )
    .await;
    spinner.finish_and_clear();

    for outcome in &outcomes {
        print_outcome(outcome);
    }

    if args.logo {
        match downloader
            .download_page_logo(&args.input, ImageSize::Large, &target_dir)
            .await
        {
            Ok(Some(path)) => print_info(&format!("Logo: {}", path.display())),
            Ok(None) => print_warning("Page has no logo"),
            Err(e) => print_warning(&format!("Cannot download logo: {}", e)),
        }
    }

    let stats = BatchStats::from_outcomes(&outcomes);
    print_batch_stats(&stats);

    if stats.failed_count > 0 {
        print_warning(&format!("{} media could not be downloaded", stats.failed_count));
    }

    Ok(config.download.success_exit_code)
}

fn persist_meta(args: &Args, config: &Config, posts: &[Post]) -> Result<()> {
    let format = OutputFormat::from(args.output_type);
    let content = render_posts(posts, format)?;

    if format == OutputFormat::Log {
        println!("{}", content);
    }

    let file = match &args.output {
        Some(output) if output.is_file() => output.clone(),
        _ => {
            let now = chrono::Local::now().naive_local();
            export_file(
                &config.download_directory(),
                &args.provider,
                &args.path,
                format.extension(),
                now,
            )?
        }
    };

    write_export(&file, &content)?;
    print_info(&file.display().to_string());

    Ok(())
}
