use crate::cli::{FilterArgs, FilterField};
use crate::docker_hub::DockerHub;
use crate::duration::parse_duration;
use crate::image_reference::ImageRef;
use crate::tags::{DateWindow, filter_tags};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use tracing::{info, warn};

const SUMMARY_LIMIT: usize = 100;

impl FilterArgs {
    /// Turns `--gt`/`--lt` into cutoffs relative to `now`. Ages given without
    /// `--field` filter on the date.
    pub fn date_window(&self, now: DateTime<Utc>) -> Result<DateWindow> {
        let greater_than = parse_duration(self.gt.as_deref().unwrap_or_default())
            .context("Cannot parse duration from 'gt'")?;
        let less_than = parse_duration(self.lt.as_deref().unwrap_or_default())
            .context("Cannot parse duration from 'lt'")?;

        match self.field.unwrap_or(FilterField::Date) {
            FilterField::Date => Ok(DateWindow::from_ages(greater_than, less_than, now)),
        }
    }
}

fn parse_image(image: &str) -> Result<ImageRef> {
    ImageRef::parse(image).with_context(|| format!("Cannot use image {:?}", image))
}

pub async fn list_tags(
    hub: &DockerHub,
    image: &str,
    filter: &FilterArgs,
    sum_size: bool,
    out: &mut impl Write,
) -> Result<()> {
    let window = filter.date_window(Utc::now())?;
    let image = parse_image(image)?;

    let tags = hub
        .list_tags(&image)
        .await
        .context("Failed retrieving Docker tags")?;
    let listing = filter_tags(&tags, &window, sum_size);
    info!("Listing {} of {} tags", listing.tags.len(), listing.total);

    write!(out, "{}", listing)?;
    Ok(())
}

pub async fn check_tag(hub: &DockerHub, image: &str, out: &mut impl Write) -> Result<()> {
    let image = parse_image(image)?;
    hub.tag_exists(&image).await?;
    writeln!(out, "{} exists", image)?;
    Ok(())
}

pub async fn pulls(hub: &DockerHub, image: &str, out: &mut impl Write) -> Result<()> {
    let image = parse_image(image)?;
    let repository = hub
        .repository(&image)
        .await
        .with_context(|| format!("Failed retrieving repository {}", image.without_tag()))?;
    writeln!(out, "{}", repository.pull_count)?;
    Ok(())
}

pub async fn stars(hub: &DockerHub, image: &str, out: &mut impl Write) -> Result<()> {
    let image = parse_image(image)?;
    let repository = hub
        .repository(&image)
        .await
        .with_context(|| format!("Failed retrieving repository {}", image.without_tag()))?;
    writeln!(out, "{}", repository.star_count)?;
    Ok(())
}

pub async fn get_summary(hub: &DockerHub, image: &str, out: &mut impl Write) -> Result<()> {
    let image = parse_image(image)?;
    let repository = hub
        .repository(&image)
        .await
        .with_context(|| format!("Failed retrieving repository {}", image.without_tag()))?;
    writeln!(out, "{}", repository.description.unwrap_or_default())?;
    Ok(())
}

pub async fn set_summary(
    hub: &DockerHub,
    image: &str,
    summary: &str,
    out: &mut impl Write,
) -> Result<()> {
    let image = parse_image(image)?;
    let length = summary.chars().count();
    if length > SUMMARY_LIMIT {
        warn!(
            "Summary is {} characters long, Docker Hub limits it to {}",
            length, SUMMARY_LIMIT
        );
    }

    let status = hub
        .update_summary(&image, summary)
        .await
        .context("There was an error updating the summary")?;
    writeln!(out, "Successfully updated with code {}.", status.as_u16())?;
    Ok(())
}

pub async fn list_images(hub: &DockerHub, namespace: &str, out: &mut impl Write) -> Result<()> {
    let images = hub
        .list_repositories(namespace)
        .await
        .with_context(|| format!("Failed retrieving images of namespace {}", namespace))?;
    for image in images {
        writeln!(out, "{}", image)?;
    }
    Ok(())
}
