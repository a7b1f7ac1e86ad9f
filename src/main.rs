mod fetcher;
mod parser;
mod payload;
mod seed;
mod store;
mod tally;
mod uploader;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use fetcher::ImageFetcher;
use uploader::{ApiClient, ApiConfig};

#[derive(Parser)]
#[command(name = "bancat_seeder", about = "BANCAT team scraper and content seeder")]
struct Cli {
    /// Base URL of the remote API
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000/api/v1")]
    api_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract team records from a saved page and fetch their images
    Extract {
        /// Saved HTML snapshot of the team page
        #[arg(long, default_value = "page_content.html")]
        page: PathBuf,
        /// Record store to (over)write
        #[arg(long, default_value = "team_data.json")]
        out: PathBuf,
        /// Content directory for downloaded images
        #[arg(long, default_value = "team_images")]
        images: PathBuf,
        /// Leave image filenames empty instead of downloading
        #[arg(long)]
        skip_images: bool,
    },
    /// Stored records overview table
    Show {
        #[arg(long, default_value = "team_data.json")]
        store: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Generate browser-console upload scripts in fixed-size chunks
    Payloads {
        #[arg(long, default_value = "team_data.json")]
        store: PathBuf,
        #[arg(long, default_value = "team_images")]
        images: PathBuf,
        /// Records per generated script
        #[arg(long, default_value = "5")]
        chunk_size: usize,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Upload stored team records straight to the API
    UploadTeam {
        #[arg(long, default_value = "team_data.json")]
        store: PathBuf,
        #[arg(long, default_value = "team_images")]
        images: PathBuf,
    },
    /// Seed dummy patients from the downloaded images
    SeedPatients {
        #[arg(long, default_value = "team_images")]
        images: PathBuf,
    },
    /// Seed the fixed story catalogue
    SeedStories,
    /// Seed the fixed testimonial catalogue
    SeedTestimonials,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            page,
            out,
            images,
            skip_images,
        } => {
            let html = std::fs::read_to_string(&page)
                .with_context(|| format!("Failed to read {}", page.display()))?;
            let mut records = parser::extract_records(&html, &parser::Markers::default());
            if records.is_empty() {
                println!("No team records found in {}.", page.display());
            }

            if !skip_images {
                let fetcher = ImageFetcher::new(&images)?;
                let pb = ProgressBar::new(records.len() as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
                        .progress_chars("=> "),
                );

                let mut fetched = 0usize;
                for record in &mut records {
                    record.image_filename =
                        fetcher.fetch(&record.image_url, &record.name).await;
                    if !record.image_filename.is_empty() {
                        fetched += 1;
                    }
                    pb.inc(1);
                }
                pb.finish_and_clear();
                println!("Images: {} of {} records have one.", fetched, records.len());
            }

            store::save(&out, &records)?;
            println!("Saved {} records to {}", records.len(), out.display());
            Ok(())
        }
        Commands::Show { store, limit } => {
            let records = store::load(&store)?;
            if records.is_empty() {
                println!("No records. Run 'extract' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<28} | {:<10} | {:<24} | {:<5} | {}",
                "#", "Name", "Category", "Designation", "Image", "Source"
            );
            println!("{}", "-".repeat(95));
            for (i, r) in records.iter().take(limit).enumerate() {
                println!(
                    "{:>3} | {:<28} | {:<10} | {:<24} | {:<5} | {}",
                    i + 1,
                    truncate(&r.name, 28),
                    r.category.as_str(),
                    truncate(&r.designation, 24),
                    if r.image_filename.is_empty() { "-" } else { "yes" },
                    r.additional_info,
                );
            }
            println!("\n{} records", records.len());
            Ok(())
        }
        Commands::Payloads {
            store,
            images,
            chunk_size,
            out_dir,
        } => {
            let records = store::load(&store)?;
            let artifacts =
                payload::build_chunks(&records, chunk_size, &images, &cli.api_base)?;
            std::fs::create_dir_all(&out_dir)?;
            for artifact in &artifacts {
                let path = out_dir.join(&artifact.filename);
                std::fs::write(&path, &artifact.contents)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Generated {}", artifact.filename);
            }
            println!(
                "{} scripts covering {} records.",
                artifacts.len(),
                records.len()
            );
            Ok(())
        }
        Commands::UploadTeam { store, images } => {
            let records = store::load(&store)?;
            let client = ApiClient::new(ApiConfig::new(&cli.api_base))?;
            let token = client.login_with_fallback().await?;
            let tally = client.upload_team(&records, &images, &token).await;
            println!("Done: {} uploaded, {} failed.", tally.ok, tally.failed);
            Ok(())
        }
        Commands::SeedPatients { images } => {
            let client = ApiClient::new(ApiConfig::new(&cli.api_base))?;
            let token = client.login_with_fallback().await?;
            let tally = seed::seed_patients(&client, &token, &images).await?;
            println!("Done: {} patients added, {} failed.", tally.ok, tally.failed);
            Ok(())
        }
        Commands::SeedStories => {
            let client = ApiClient::new(ApiConfig::new(&cli.api_base))?;
            let token = client.login_with_fallback().await?;
            let tally = seed::seed_stories(&client, &token).await;
            println!(
                "Seeding complete: {}/{} stories added.",
                tally.ok,
                tally.total()
            );
            Ok(())
        }
        Commands::SeedTestimonials => {
            let client = ApiClient::new(ApiConfig::new(&cli.api_base))?;
            let token = client.login_with_fallback().await?;
            let tally = seed::seed_testimonials(&client, &token).await;
            println!(
                "Seeding complete: {}/{} testimonials added.",
                tally.ok,
                tally.total()
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
