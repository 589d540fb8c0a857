//! Favorite lifecycle handlers.

use netroster_core::{FavoriteUpdate, NewFavorite, ReconciliationCache};

use crate::cli::{FavoritesArgs, FavoritesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{parse_mac, warm_view};

pub async fn handle(
    cache: &ReconciliationCache,
    args: FavoritesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    let record = match args.command {
        FavoritesCommand::Add {
            mac,
            name,
            description,
        } => {
            let new = NewFavorite::parse(&mac, &name, description.as_deref())?;
            warm_view(cache).await?;
            cache.add_favorite(new).await?
        }

        FavoritesCommand::Edit {
            mac,
            new_mac,
            name,
            description,
        } => {
            let mac = parse_mac(&mac)?;
            let update = FavoriteUpdate::parse(
                new_mac.as_deref(),
                name.as_deref(),
                description.as_deref(),
            )?;
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "edit".into(),
                    reason: "nothing to change; pass --mac, --name, or --description".into(),
                });
            }
            warm_view(cache).await?;
            cache.update_favorite(&mac, update).await?
        }

        FavoritesCommand::Remove { mac } => {
            let mac = parse_mac(&mac)?;
            warm_view(cache).await?;
            let demoted = cache.remove_favorite(&mac).await?;
            if !global.quiet {
                eprintln!("Removed favorite {}", mac.colon_form());
            }
            match demoted {
                Some(record) => record,
                None => return Ok(()),
            }
        }

        FavoritesCommand::Promote { mac, name } => {
            let mac = parse_mac(&mac)?;
            warm_view(cache).await?;
            cache.promote(&mac, name.as_deref()).await?
        }
    };

    let out = output::render_single(
        &global.output,
        &record,
        |d| output::device_detail(d, color),
        output::mac_id,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
