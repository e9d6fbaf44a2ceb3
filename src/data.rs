use crate::config::AppConfig;
use crate::topology::Topology;
use crate::types::EducationRecord;
use anyhow::{Context, Result};

/// Fetch the education dataset and the county topology concurrently.
/// Both requests must succeed; there is no retry and no partial
/// result.
pub async fn fetch_datasets(config: &AppConfig) -> Result<(Vec<EducationRecord>, Topology)> {
    println!("Fetching datasets...");
    let client = reqwest::Client::new();
    let (education, topology) = tokio::try_join!(
        fetch_education(&client, &config.input.education_url),
        fetch_topology(&client, &config.input.counties_url),
    )?;
    println!(
        "Fetched {} education records and topology with {} arcs",
        education.len(),
        topology.arcs.len()
    );
    Ok((education, topology))
}

/// Fetch only the education dataset, for the lookup API in serve
/// mode.
pub async fn fetch_education_data(config: &AppConfig) -> Result<Vec<EducationRecord>> {
    let client = reqwest::Client::new();
    fetch_education(&client, &config.input.education_url).await
}

async fn fetch_education(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<EducationRecord>> {
    let records = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch education dataset from {}", url))?
        .error_for_status()
        .context("Education dataset request returned an error status")?
        .json()
        .await
        .context("Failed to parse education dataset JSON")?;
    Ok(records)
}

async fn fetch_topology(client: &reqwest::Client, url: &str) -> Result<Topology> {
    let topology = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch county topology from {}", url))?
        .error_for_status()
        .context("County topology request returned an error status")?
        .json()
        .await
        .context("Failed to parse county topology JSON")?;
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use crate::types::EducationRecord;

    #[test]
    fn education_record_uses_dataset_field_names() {
        let json = r#"{
            "fips": 1001,
            "state": "AL",
            "area_name": "Autauga County",
            "bachelorsOrHigher": 21.9
        }"#;
        let record: EducationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.fips, 1001);
        assert_eq!(record.state, "AL");
        assert_eq!(record.area_name, "Autauga County");
        assert_eq!(record.bachelors_or_higher, 21.9);
    }
}
