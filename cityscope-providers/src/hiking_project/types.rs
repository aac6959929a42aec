//! Hiking Project trail search payload

use cityscope_core::{split_condition_date, ShapeError, Trail};
use serde::Deserialize;

use super::PROVIDER;
use crate::require;

#[derive(Debug, Clone, Deserialize)]
pub struct TrailsResponse {
    #[serde(default)]
    pub trails: Option<Vec<RawTrail>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub stars: Option<f64>,
    #[serde(default)]
    pub star_votes: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub condition_status: Option<String>,
    #[serde(default)]
    pub condition_date: Option<String>,
}

fn reshape_trail(i: usize, raw: RawTrail) -> Result<Trail, ShapeError> {
    let field = |name: &str| format!("trails[{i}].{name}");
    let condition_date = require(raw.condition_date, PROVIDER, field("conditionDate"))?;
    let (condition_date, condition_time) = split_condition_date(&condition_date);

    Ok(Trail {
        name: require(raw.name, PROVIDER, field("name"))?,
        location: require(raw.location, PROVIDER, field("location"))?,
        length: require(raw.length, PROVIDER, field("length"))?,
        stars: require(raw.stars, PROVIDER, field("stars"))?,
        star_votes: require(raw.star_votes, PROVIDER, field("starVotes"))?,
        summary: raw.summary.unwrap_or_default(),
        trail_url: require(raw.url, PROVIDER, field("url"))?,
        conditions: require(raw.condition_status, PROVIDER, field("conditionStatus"))?,
        condition_date,
        condition_time,
    })
}

pub fn reshape(response: TrailsResponse) -> Result<Vec<Trail>, ShapeError> {
    require(response.trails, PROVIDER, "trails")?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| reshape_trail(i, raw))
        .collect()
}
