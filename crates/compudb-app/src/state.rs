// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{Location, SortField, SortSpec};

/// One CRUD slice: the fetched page, the focused record, and the flags the
/// views key off. Works the same for every entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<T> {
    pub entities: Vec<T>,
    pub entity: Option<T>,
    pub loading: bool,
    pub updating: bool,
    pub update_success: bool,
    pub last_error: Option<String>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            entity: None,
            loading: false,
            updating: false,
            update_success: false,
            last_error: None,
        }
    }
}

impl<T> EntityState<T> {
    /// Replaces the fetched page. A failed fetch leaves the previous page in
    /// place and records the error.
    pub fn load_list<F>(&mut self, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Result<Vec<T>>,
    {
        self.loading = true;
        self.last_error = None;
        let outcome = fetch();
        self.loading = false;
        match outcome {
            Ok(entities) => {
                self.entities = entities;
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(format!("{error:#}"));
                Err(error)
            }
        }
    }

    /// Replaces the focused record. Not-found is a failure like any other:
    /// the previously focused record stays untouched.
    pub fn load_one<F>(&mut self, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Result<T>,
    {
        self.loading = true;
        self.last_error = None;
        let outcome = fetch();
        self.loading = false;
        match outcome {
            Ok(entity) => {
                self.entity = Some(entity);
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(format!("{error:#}"));
                Err(error)
            }
        }
    }

    /// Runs a create or update and stores the server's returned
    /// representation. `update_success` is set only on success.
    pub fn persist<F>(&mut self, save: F) -> Result<()>
    where
        F: FnOnce() -> Result<T>,
    {
        self.updating = true;
        self.update_success = false;
        self.last_error = None;
        let outcome = save();
        self.updating = false;
        match outcome {
            Ok(entity) => {
                self.entity = Some(entity);
                self.update_success = true;
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(format!("{error:#}"));
                Err(error)
            }
        }
    }

    /// Runs a delete. Success clears the focused record but never prunes
    /// the fetched page; callers re-fetch the list to observe the removal.
    pub fn remove<F>(&mut self, delete: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.updating = true;
        self.update_success = false;
        self.last_error = None;
        let outcome = delete();
        self.updating = false;
        match outcome {
            Ok(()) => {
                self.entity = None;
                self.update_success = true;
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(format!("{error:#}"));
                Err(error)
            }
        }
    }

    pub fn reset(&mut self) {
        self.entity = None;
        self.update_success = false;
        self.last_error = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub location: Location,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            location: Location::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Location),
    ToggleSort(SortField),
    SetSort(SortSpec),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    LocationChanged(Location),
    SortChanged(SortSpec),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(location) => {
                self.location = location;
                vec![AppEvent::LocationChanged(self.location)]
            }
            AppCommand::ToggleSort(field) => {
                let sort = self.location.sort.toggled(field);
                self.apply_sort(sort)
            }
            AppCommand::SetSort(sort) => self.apply_sort(sort),
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn apply_sort(&mut self, sort: SortSpec) -> Vec<AppEvent> {
        self.location.sort = sort;
        vec![
            AppEvent::SortChanged(sort),
            AppEvent::LocationChanged(self.location),
        ]
    }
}
