// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use compudb_api::Client;
use compudb_app::{Computer, ComputerId, SortDirection, SortField, SortSpec};
use compudb_testkit::{MockApi, seeded_catalog};
use std::io::Read;
use std::thread;
use std::time::Duration;
use time::{Date, Month};
use tiny_http::{Header, Response, Server};

fn new_computer(name: &str) -> Computer {
    Computer {
        id: None,
        name: name.to_owned(),
        introduced: None,
        removed: None,
        hardware: None,
        software: None,
        company: None,
    }
}

#[test]
fn connection_error_contains_actionable_remediation() {
    let client =
        Client::new("http://127.0.0.1:1", Duration::from_millis(50)).expect("client should initialize");

    let error = client
        .list_computers(&SortSpec::default())
        .expect_err("unreachable endpoint should fail");
    let message = error.to_string();
    assert!(message.contains("http://127.0.0.1:1"));
    assert!(message.contains("check api.base_url"));
}

#[test]
fn list_computers_sends_sort_in_query_string() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/computers?sort=name,desc");
        let response = Response::from_string("[]").with_status_code(200).with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        );
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let computers = client.list_computers(&SortSpec {
        field: SortField::Name,
        direction: SortDirection::Desc,
    })?;
    assert!(computers.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_computer_posts_json_and_decodes_201_echo() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method().as_str(), "POST");
        assert_eq!(request.url(), "/api/computers");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should read");
        assert!(body.contains("\"ah sanctity hence\""));
        assert!(body.contains("\"2023-12-05\""));
        assert!(body.contains("\"hardware\":28"));
        assert!(body.contains("\"software\":23"));
        assert!(!body.contains("\"id\""));

        let echoed = body.replacen('{', "{\"id\":101,", 1);
        let response = Response::from_string(echoed).with_status_code(201).with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        );
        request.respond(response).expect("response should succeed");
    });

    let record = Computer {
        introduced: Some(Date::from_calendar_date(2023, Month::December, 5)?),
        removed: Some(Date::from_calendar_date(2023, Month::December, 5)?),
        hardware: Some(28),
        software: Some(23),
        ..new_computer("ah sanctity hence")
    };

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let created = client.create_computer(&record)?;
    assert_eq!(created.id, Some(ComputerId::new(101)));
    assert_eq!(created.name, "ah sanctity hence");
    assert_eq!(created.hardware, Some(28));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_computer_rejects_record_with_id_before_any_network() -> Result<()> {
    // Port 1 never answers; an early rejection is the only way this passes.
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let record = Computer {
        id: Some(ComputerId::new(3)),
        ..new_computer("already stored")
    };

    let error = client
        .create_computer(&record)
        .expect_err("record with id should be rejected");
    assert!(error.to_string().contains("must not carry an id"));
    Ok(())
}

#[test]
fn create_computer_surfaces_problem_detail_on_400() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = r#"{"type":"about:blank","title":"Bad Request","detail":"name must not be blank","status":400}"#;
        let response = Response::from_string(body).with_status_code(400).with_header(
            Header::from_bytes("Content-Type", "application/problem+json")
                .expect("valid content type header"),
        );
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .create_computer(&new_computer(" "))
        .expect_err("server rejection should surface");
    assert!(error.to_string().contains("name must not be blank"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn get_computer_maps_404_to_not_found_message() -> Result<()> {
    let api = MockApi::start()?;
    let client = Client::new(&api.url(), Duration::from_secs(1))?;

    let error = client
        .get_computer(ComputerId::new(99))
        .expect_err("missing computer should fail");
    assert!(error.to_string().contains("computer 99 not found"));
    assert_eq!(api.requests(), vec!["GET /api/computers/99".to_owned()]);
    Ok(())
}

#[test]
fn update_computer_puts_to_id_path() -> Result<()> {
    let api = MockApi::start()?;
    let (companies, computers) = seeded_catalog(11, 3)?;
    api.seed_companies(companies);
    api.seed_computers(computers.clone());

    let client = Client::new(&api.url(), Duration::from_secs(1))?;
    let mut record = computers[0].clone();
    let id = record.id.expect("seeded computer should carry an id");
    record.name = "renamed".to_owned();

    let updated = client.update_computer(&record)?;
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.id, Some(id));
    assert!(
        api.requests()
            .contains(&format!("PUT /api/computers/{}", id.get()))
    );
    Ok(())
}

#[test]
fn delete_computer_expects_204_and_list_excludes_it() -> Result<()> {
    let api = MockApi::start()?;
    let (companies, computers) = seeded_catalog(5, 4)?;
    api.seed_companies(companies);
    api.seed_computers(computers.clone());

    let client = Client::new(&api.url(), Duration::from_secs(1))?;
    let id = computers[1].id.expect("seeded computer should carry an id");
    client.delete_computer(id)?;

    let remaining = client.list_computers(&SortSpec::default())?;
    assert_eq!(remaining.len(), computers.len() - 1);
    assert!(remaining.iter().all(|c| c.id != Some(id)));
    Ok(())
}

#[test]
fn delete_computer_fails_on_unexpected_status() -> Result<()> {
    let api = MockApi::start()?;
    let client = Client::new(&api.url(), Duration::from_secs(1))?;

    let error = client
        .delete_computer(ComputerId::new(42))
        .expect_err("deleting a missing computer should fail");
    assert!(error.to_string().contains("does not exist"));
    Ok(())
}

#[test]
fn list_companies_decodes_catalog() -> Result<()> {
    let api = MockApi::start()?;
    let (companies, _) = seeded_catalog(9, 0)?;
    api.seed_companies(companies.clone());

    let client = Client::new(&api.url(), Duration::from_secs(1))?;
    let fetched = client.list_companies()?;
    assert_eq!(fetched, companies);
    Ok(())
}
