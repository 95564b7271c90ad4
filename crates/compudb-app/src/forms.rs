// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::Date;
use time::macros::format_description;

use crate::{
    CompanyId, Computer, ComputerId, HARDWARE_MAX, HARDWARE_MIN, SOFTWARE_MAX, SOFTWARE_MIN,
    model::Company,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Introduced,
    Removed,
    Hardware,
    Software,
    Company,
}

impl FormField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Introduced,
        Self::Removed,
        Self::Hardware,
        Self::Software,
        Self::Company,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Introduced => "introduced",
            Self::Removed => "removed",
            Self::Hardware => "hardware",
            Self::Software => "software",
            Self::Company => "company",
        }
    }
}

/// Form fields as typed, before coercion. Numbers and dates stay strings
/// until submit so partial input never corrupts the record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputerFormInput {
    pub id: Option<ComputerId>,
    pub name: String,
    pub introduced: String,
    pub removed: String,
    pub hardware: String,
    pub software: String,
    pub company: Option<CompanyId>,
}

impl ComputerFormInput {
    pub fn blank() -> Self {
        Self::default()
    }

    /// Pre-fills the edit form so untouched fields survive submission.
    pub fn from_record(record: &Computer) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            introduced: record.introduced.map(date_to_input).unwrap_or_default(),
            removed: record.removed.map(date_to_input).unwrap_or_default(),
            hardware: record.hardware.map(|v| v.to_string()).unwrap_or_default(),
            software: record.software.map(|v| v.to_string()).unwrap_or_default(),
            company: record.company.as_ref().map(|company| company.id),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Per-field check for inline display next to the field.
    pub fn field_error(&self, field: FormField) -> Option<String> {
        match field {
            FormField::Name => {
                if self.name.trim().is_empty() {
                    Some("name is required".to_owned())
                } else {
                    None
                }
            }
            FormField::Introduced => check_date(&self.introduced).err().map(|e| e.to_string()),
            FormField::Removed => check_date(&self.removed).err().map(|e| e.to_string()),
            FormField::Hardware => {
                check_bounded_int(&self.hardware, HARDWARE_MIN, HARDWARE_MAX)
                    .err()
                    .map(|e| e.to_string())
            }
            FormField::Software => {
                check_bounded_int(&self.software, SOFTWARE_MIN, SOFTWARE_MAX)
                    .err()
                    .map(|e| e.to_string())
            }
            FormField::Company => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("computer name is required -- enter a name and retry");
        }
        if let Err(error) = check_date(&self.introduced) {
            bail!("introduced: {error}");
        }
        if let Err(error) = check_date(&self.removed) {
            bail!("removed: {error}");
        }
        if let Err(error) = check_bounded_int(&self.hardware, HARDWARE_MIN, HARDWARE_MAX) {
            bail!("hardware: {error}");
        }
        if let Err(error) = check_bounded_int(&self.software, SOFTWARE_MIN, SOFTWARE_MAX) {
            bail!("software: {error}");
        }
        Ok(())
    }

    /// Validates, coerces, and merges over the currently loaded record so
    /// fields this form does not manage carry over on edit. The selected
    /// company must still exist in the fetched company list.
    pub fn into_record(
        &self,
        current: Option<&Computer>,
        companies: &[Company],
    ) -> Result<Computer> {
        self.validate()?;

        let company = match self.company {
            None => None,
            Some(id) => {
                let Some(found) = companies.iter().find(|company| company.id == id) else {
                    bail!(
                        "company {} is no longer available -- refresh the company list and retry",
                        id.get()
                    );
                };
                Some(found.clone())
            }
        };

        let mut record = current.cloned().unwrap_or(Computer {
            id: None,
            name: String::new(),
            introduced: None,
            removed: None,
            hardware: None,
            software: None,
            company: None,
        });

        record.id = self.id.or(record.id);
        record.name = self.name.trim().to_owned();
        record.introduced = check_date(&self.introduced)?;
        record.removed = check_date(&self.removed)?;
        record.hardware = check_bounded_int(&self.hardware, HARDWARE_MIN, HARDWARE_MAX)?;
        record.software = check_bounded_int(&self.software, SOFTWARE_MIN, SOFTWARE_MAX)?;
        record.company = company;
        Ok(record)
    }
}

fn date_to_input(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn check_date(raw: &str) -> Result<Option<Date>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match Date::parse(trimmed, &format_description!("[year]-[month]-[day]")) {
        Ok(date) => Ok(Some(date)),
        Err(_) => bail!("invalid date {trimmed:?}; use YYYY-MM-DD"),
    }
}

fn check_bounded_int(raw: &str, min: i64, max: i64) -> Result<Option<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Ok(value) = trimmed.parse::<i64>() else {
        bail!("{trimmed:?} is not a number");
    };
    if value < min || value > max {
        bail!("{value} is out of range; must be between {min} and {max}");
    }
    Ok(Some(value))
}
