//! Listing commands: list, show, create, edit, delete.

use std::io::{self, BufRead, Write};

use feirinha_core::{ListingId, PhotoSet, Price};

use feirinha_app::models::{EnrichedListing, ListingPatch, NewListing};

use super::{CliError, Context};

/// Print the enriched feed. Own listings come first unless the caller
/// asked to hide them.
pub async fn list(show_own: bool) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let session = ctx.require_session().await?;

    // The refresher drops results superseded by a newer refresh; in a
    // one-shot invocation there is none, so a discard means nothing to
    // print.
    let Some(feed) = ctx
        .state
        .feed_refresher()
        .refresh(Some(&session), show_own)
        .await?
    else {
        return Ok(());
    };

    print_feed(&feed);
    Ok(())
}

/// Print one listing with its seller contact details.
pub async fn show(id: &str) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let session = ctx.require_session().await?;
    let id = ListingId::new(id);

    // The feed join already resolved the seller once; for a single
    // listing it is simpler to reuse it than to join by hand.
    let feed = ctx
        .state
        .feed()
        .annotated_listings(Some(&session), true)
        .await?;
    let Some(entry) = feed.iter().find(|entry| entry.listing.id == id) else {
        return Err(CliError::Listing(
            feirinha_app::services::ListingError::NotFound,
        ));
    };

    print_entry(entry);
    Ok(())
}

/// Create a listing owned by the signed-in user.
pub async fn create(
    title: String,
    description: String,
    price: f64,
    photos: Vec<String>,
) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let session = ctx.require_session().await?;

    let listing = NewListing {
        title,
        description,
        price: Price::from_f64(price)?,
        photos: PhotoSet::from(photos),
    };
    let id = ctx.state.listings().create(&session, &listing).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Created listing {id}.");
    }
    Ok(())
}

/// Patch one of the signed-in user's listings.
pub async fn edit(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    photos: Option<Vec<String>>,
) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let session = ctx.require_session().await?;
    let id = ListingId::new(id);

    let patch = ListingPatch {
        title,
        description,
        price: price.map(Price::from_f64).transpose()?,
        photos: photos.map(PhotoSet::from),
    };
    ctx.state.listings().update(&session, &id, &patch).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Updated listing {id}.");
    }
    Ok(())
}

/// Delete one of the signed-in user's listings, after confirmation.
pub async fn delete(id: &str, skip_confirmation: bool) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let session = ctx.require_session().await?;
    let id = ListingId::new(id);

    // Read the title back before prompting so the user confirms the
    // right listing; this also surfaces NotFound/NotOwner early.
    let listing = ctx.state.listings().get(&session, &id).await?;

    if !skip_confirmation && !confirm(&format!("Delete \"{}\"? [y/N] ", listing.title))? {
        #[allow(clippy::print_stdout)]
        {
            println!("Cancelled.");
        }
        return Ok(());
    }

    ctx.state.listings().delete(&session, &id).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Deleted listing {id}.");
    }
    Ok(())
}

/// Prompt on stdout and read a yes/no answer from stdin. Anything but
/// an explicit yes declines.
fn confirm(prompt: &str) -> Result<bool, io::Error> {
    #[allow(clippy::print_stdout)]
    {
        print!("{prompt}");
    }
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    ))
}

#[allow(clippy::print_stdout)]
fn print_feed(feed: &[EnrichedListing]) {
    if feed.is_empty() {
        println!("No listings.");
        return;
    }
    for entry in feed {
        println!(
            "{}  {}  {}",
            entry.listing.id, entry.listing.price, entry.listing.title
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_entry(entry: &EnrichedListing) {
    println!("{} ({})", entry.listing.title, entry.listing.id);
    println!("  Price:   {}", entry.listing.price);
    if !entry.listing.description.is_empty() {
        println!("  About:   {}", entry.listing.description);
    }
    for photo in entry.listing.photos.iter() {
        println!("  Photo:   {photo}");
    }
    println!("  Seller:  {}", entry.seller_email);
    println!("  Phone:   {}", entry.seller_phone);
    println!("  Address: {}", entry.seller_address);
}
