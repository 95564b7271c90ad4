// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::Date;

use crate::ids::*;

pub const HARDWARE_MIN: i64 = 0;
pub const HARDWARE_MAX: i64 = 40;
pub const SOFTWARE_MIN: i64 = 0;
pub const SOFTWARE_MAX: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Columns the server accepts as a list sort key. The company column is
/// rendered but never sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Id,
    Name,
    Introduced,
    Removed,
    Hardware,
    Software,
}

impl SortField {
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Name,
        Self::Introduced,
        Self::Removed,
        Self::Hardware,
        Self::Software,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Introduced => "introduced",
            Self::Removed => "removed",
            Self::Hardware => "hardware",
            Self::Software => "software",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "introduced" => Some(Self::Introduced),
            "removed" => Some(Self::Removed),
            "hardware" => Some(Self::Hardware),
            "software" => Some(Self::Software),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl SortSpec {
    /// Parses the `<field>,<direction>` form used in the list query string.
    pub fn parse(value: &str) -> Option<Self> {
        let (field, direction) = value.split_once(',')?;
        Some(Self {
            field: SortField::parse(field)?,
            direction: SortDirection::parse(direction)?,
        })
    }

    pub fn query(self) -> String {
        format!("{},{}", self.field.as_str(), self.direction.as_str())
    }

    /// Selecting the active field flips the direction; any other field
    /// starts a fresh ascending sort.
    pub fn toggled(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    ComputerList,
    ComputerNew,
    ComputerDetail(ComputerId),
    ComputerEdit(ComputerId),
    ComputerDelete(ComputerId),
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Self::ComputerList => "/computer".to_owned(),
            Self::ComputerNew => "/computer/new".to_owned(),
            Self::ComputerDetail(id) => format!("/computer/{}", id.get()),
            Self::ComputerEdit(id) => format!("/computer/{}/edit", id.get()),
            Self::ComputerDelete(id) => format!("/computer/{}/delete", id.get()),
        }
    }
}

/// A restorable client location. The list route carries its sort in the
/// query string so the rendered location is enough to reproduce the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub route: Route,
    pub sort: SortSpec,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            route: Route::ComputerList,
            sort: SortSpec::default(),
        }
    }
}

impl Location {
    pub fn list(sort: SortSpec) -> Self {
        Self {
            route: Route::ComputerList,
            sort,
        }
    }

    /// A malformed or absent sort falls back to the default; an unknown
    /// path is an error.
    pub fn parse(raw: &str) -> Result<Self> {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };

        let sort = query
            .and_then(|query| query.strip_prefix("sort="))
            .and_then(SortSpec::parse)
            .unwrap_or_default();

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let route = match segments.as_slice() {
            ["computer"] | [""] => Route::ComputerList,
            ["computer", "new"] => Route::ComputerNew,
            ["computer", id] => Route::ComputerDetail(parse_id(id, raw)?),
            ["computer", id, "edit"] => Route::ComputerEdit(parse_id(id, raw)?),
            ["computer", id, "delete"] => Route::ComputerDelete(parse_id(id, raw)?),
            _ => bail!("unknown route {raw:?}; expected /computer, /computer/new, or /computer/<id>[/edit|/delete]"),
        };

        Ok(Self { route, sort })
    }
}

fn parse_id(raw: &str, route: &str) -> Result<ComputerId> {
    let value: i64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid computer id {raw:?} in route {route:?}"))?;
    Ok(ComputerId::new(value))
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.route {
            Route::ComputerList => write!(f, "/computer?sort={}", self.sort.query()),
            route => write!(f, "{}", route.path()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Computer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ComputerId>,
    pub name: String,
    #[serde(default)]
    pub introduced: Option<Date>,
    #[serde(default)]
    pub removed: Option<Date>,
    #[serde(default)]
    pub hardware: Option<i64>,
    #[serde(default)]
    pub software: Option<i64>,
    #[serde(default)]
    pub company: Option<Company>,
}

#[cfg(test)]
mod tests {
    use super::{Location, Route, SortDirection, SortField, SortSpec};
    use crate::ids::ComputerId;
    use anyhow::Result;

    #[test]
    fn sort_spec_round_trips_through_query_form() {
        for field in SortField::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let spec = SortSpec { field, direction };
                assert_eq!(SortSpec::parse(&spec.query()), Some(spec));
            }
        }
    }

    #[test]
    fn sort_spec_rejects_malformed_input() {
        assert_eq!(SortSpec::parse("name"), None);
        assert_eq!(SortSpec::parse("name,sideways"), None);
        assert_eq!(SortSpec::parse("company,asc"), None);
        assert_eq!(SortSpec::parse(""), None);
    }

    #[test]
    fn toggling_active_field_flips_direction() {
        let spec = SortSpec::default();
        let toggled = spec.toggled(SortField::Id);
        assert_eq!(toggled.field, SortField::Id);
        assert_eq!(toggled.direction, SortDirection::Desc);
        assert_eq!(toggled.toggled(SortField::Id).direction, SortDirection::Asc);
    }

    #[test]
    fn toggling_new_field_starts_ascending() {
        let spec = SortSpec {
            field: SortField::Name,
            direction: SortDirection::Desc,
        };
        let toggled = spec.toggled(SortField::Hardware);
        assert_eq!(toggled.field, SortField::Hardware);
        assert_eq!(toggled.direction, SortDirection::Asc);
    }

    #[test]
    fn list_location_renders_sort_query() {
        let location = Location::list(SortSpec {
            field: SortField::Name,
            direction: SortDirection::Desc,
        });
        assert_eq!(location.to_string(), "/computer?sort=name,desc");
    }

    #[test]
    fn location_parse_round_trips_every_route() -> Result<()> {
        let id = ComputerId::new(7);
        let cases = [
            Location::default(),
            Location::list(SortSpec {
                field: SortField::Software,
                direction: SortDirection::Desc,
            }),
            Location {
                route: Route::ComputerNew,
                sort: SortSpec::default(),
            },
            Location {
                route: Route::ComputerDetail(id),
                sort: SortSpec::default(),
            },
            Location {
                route: Route::ComputerEdit(id),
                sort: SortSpec::default(),
            },
            Location {
                route: Route::ComputerDelete(id),
                sort: SortSpec::default(),
            },
        ];
        for location in cases {
            assert_eq!(Location::parse(&location.to_string())?, location);
        }
        Ok(())
    }

    #[test]
    fn location_parse_falls_back_to_default_sort() -> Result<()> {
        let plain = Location::parse("/computer")?;
        assert_eq!(plain.sort, SortSpec::default());

        let malformed = Location::parse("/computer?sort=name,sideways")?;
        assert_eq!(malformed.sort, SortSpec::default());
        Ok(())
    }

    #[test]
    fn location_parse_rejects_unknown_route() {
        let error = Location::parse("/vendor/3").expect_err("unknown route should fail");
        assert!(error.to_string().contains("unknown route"));

        let error = Location::parse("/computer/abc").expect_err("bad id should fail");
        assert!(error.to_string().contains("invalid computer id"));
    }
}
