//! Record management through the street API.
//!
//! Every command starts a [`StreetSync`] controller against
//! `STREETS_API_URL` (default `http://localhost:5001`) and prints through a
//! terminal presenter.

use clap::Args;

use tankstellen_client::{Mutation, Presenter, SortOrder, StreetSync, StreetsClient, view};
use tankstellen_core::{Coordinates, Street, StreetId, StreetInput};

const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Address and optional position of a street.
#[derive(Debug, Args)]
pub struct StreetArgs {
    /// Street address
    #[arg(short, long)]
    address: String,

    /// Longitude (requires --latitude)
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Latitude (requires --longitude)
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    latitude: Option<f64>,
}

impl StreetArgs {
    fn into_input(self) -> Result<StreetInput, Box<dyn std::error::Error>> {
        let coordinates = match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(Coordinates::new(longitude, latitude)),
            (None, None) => None,
            _ => return Err("--longitude and --latitude must be given together".into()),
        };
        Ok(StreetInput::new(self.address, coordinates)?)
    }
}

/// Prints rows and notices to the terminal.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    /// Suppress row output; used by write commands, which only report the outcome.
    quiet: bool,
}

impl TerminalPresenter {
    const fn quiet() -> Self {
        Self { quiet: true }
    }
}

fn format_row(street: &Street) -> String {
    street.coordinates.map_or_else(
        || format!("{}  {}", street.id, street.address),
        |c| {
            format!(
                "{}  {}  ({:.6}, {:.6})",
                street.id, street.address, c.longitude, c.latitude
            )
        },
    )
}

impl Presenter for TerminalPresenter {
    #[allow(clippy::print_stdout)]
    fn render(&mut self, streets: &[Street]) {
        if self.quiet {
            return;
        }
        for street in streets {
            println!("{}", format_row(street));
        }
        println!("{} street(s)", streets.len());
    }

    #[allow(clippy::print_stdout)]
    fn notify(&mut self, message: &str) {
        println!("{message}");
    }

    #[allow(clippy::print_stderr)]
    fn report_error(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

fn api_url() -> String {
    std::env::var("STREETS_API_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn controller(
    presenter: TerminalPresenter,
) -> Result<StreetSync<StreetsClient, TerminalPresenter>, Box<dyn std::error::Error>> {
    let client = StreetsClient::new(&api_url())?;
    tracing::debug!(base_url = %client.base_url(), "Using street API");
    Ok(StreetSync::new(client, presenter))
}

/// Fetch and print the collection, optionally filtered and sorted.
///
/// # Errors
///
/// Returns an error if the API is unreachable or rejects the request.
pub async fn list(
    filter: Option<&str>,
    sort: Option<SortOrder>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sync = controller(TerminalPresenter::quiet())?;
    sync.start().await?;

    let mut rows = view::filter(sync.cache(), filter.unwrap_or_default());
    if let Some(order) = sort {
        rows = view::sort(&rows, order);
    }

    sync.presenter_mut().quiet = false;
    sync.presenter_mut().render(&rows);
    Ok(())
}

async fn mutate(mutation: Mutation) -> Result<(), Box<dyn std::error::Error>> {
    let mut sync = controller(TerminalPresenter::quiet())?;
    let confirmation = sync.mutate(mutation).await?;

    if let Some(id) = confirmation.id {
        tracing::info!(street_id = %id, "{}", confirmation.message);
    } else {
        tracing::info!("{}", confirmation.message);
    }
    Ok(())
}

/// Add a street.
///
/// # Errors
///
/// Returns an error if the input is incomplete or the API rejects it.
pub async fn create(street: StreetArgs) -> Result<(), Box<dyn std::error::Error>> {
    mutate(Mutation::Create(street.into_input()?)).await
}

/// Replace a street.
///
/// # Errors
///
/// Returns an error if the identifier is malformed, the input is
/// incomplete, or the API rejects it.
pub async fn update(id: &str, street: StreetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let id = StreetId::parse(id)?;
    mutate(Mutation::Update(id, street.into_input()?)).await
}

/// Delete a street.
///
/// # Errors
///
/// Returns an error if the identifier is malformed or the API rejects it.
pub async fn delete(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = StreetId::parse(id)?;
    mutate(Mutation::Delete(id)).await
}
