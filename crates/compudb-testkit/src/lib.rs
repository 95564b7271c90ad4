// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use compudb_app::{Company, CompanyId, Computer, ComputerId, SortDirection, SortField, SortSpec};
use std::cmp::Ordering;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use time::{Date, Month};
use tiny_http::{Header, Method, Response, Server};

const COMPUTER_MAKES: [&str; 14] = [
    "MacBook Pro",
    "ThinkPad T480",
    "PDP-11",
    "Amiga 500",
    "Apple II",
    "Commodore 64",
    "ZX Spectrum",
    "Altair 8800",
    "NeXTcube",
    "VAX-11",
    "Osborne 1",
    "BBC Micro",
    "TRS-80",
    "Cray-1",
];

const COMPANY_NAMES: [&str; 10] = [
    "Apple Inc.",
    "Thinking Machines",
    "Digital Equipment Corporation",
    "Commodore",
    "Sinclair Research",
    "MITS",
    "NeXT",
    "Tandy Corporation",
    "Acorn Computers",
    "Cray Research",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of catalog records. The same seed always yields the
/// same sequence, so fixtures stay stable across runs.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn company(&mut self) -> Company {
        let id = self.next_id;
        self.next_id += 1;
        Company {
            id: CompanyId::new(id),
            name: COMPANY_NAMES[self.rng.int_n(COMPANY_NAMES.len())].to_owned(),
        }
    }

    pub fn computer(&mut self, companies: &[Company]) -> Computer {
        let id = self.next_id;
        self.next_id += 1;

        let make = COMPUTER_MAKES[self.rng.int_n(COMPUTER_MAKES.len())];
        let introduced = self.date_in_range(1970, REFERENCE_YEAR - 1);
        let removed = if self.rng.bool() {
            Some(self.date_in_range(introduced.year(), REFERENCE_YEAR))
        } else {
            None
        };
        let company = if companies.is_empty() || self.rng.bool() {
            None
        } else {
            Some(companies[self.rng.int_n(companies.len())].clone())
        };

        Computer {
            id: Some(ComputerId::new(id)),
            name: format!("{make} {}", self.int_range(1, 999)),
            introduced: Some(introduced),
            removed,
            hardware: Some(self.int_range(0, 40)),
            software: Some(self.int_range(0, 60)),
            company,
        }
    }

    pub fn date_in_range(&mut self, min_year: i32, max_year: i32) -> Date {
        let year = self.int_range(i64::from(min_year), i64::from(max_year)) as i32;
        let month = Month::try_from(self.int_range(1, 12) as u8).unwrap_or(Month::January);
        let day = self.int_range(1, 28) as u8;
        Date::from_calendar_date(year, month, day)
            .unwrap_or_else(|_| Date::from_ordinal_date(year, 1).expect("valid ordinal date"))
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn computer_makes() -> &'static [&'static str] {
    &COMPUTER_MAKES
}

pub fn company_names() -> &'static [&'static str] {
    &COMPANY_NAMES
}

#[derive(Debug, Default)]
struct CatalogStore {
    computers: Vec<Computer>,
    companies: Vec<Company>,
    next_id: i64,
    requests: Vec<String>,
}

/// In-process catalog server speaking the same REST surface as the real
/// backend. Every request is logged as `METHOD url` for assertions.
pub struct MockApi {
    server: Arc<Server>,
    store: Arc<Mutex<CatalogStore>>,
    handle: Option<JoinHandle<()>>,
}

impl MockApi {
    pub fn start() -> Result<Self> {
        let server = Arc::new(
            Server::http("127.0.0.1:0")
                .map_err(|error| anyhow::anyhow!("start mock server: {error}"))?,
        );
        let store = Arc::new(Mutex::new(CatalogStore {
            next_id: 1,
            ..CatalogStore::default()
        }));

        let handle = {
            let server = Arc::clone(&server);
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                while let Ok(request) = server.recv() {
                    handle_request(&store, request);
                }
            })
        };

        Ok(Self {
            server,
            store: store.clone(),
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.server.server_addr())
    }

    pub fn seed_computers(&self, computers: Vec<Computer>) {
        let mut store = self.lock();
        for computer in &computers {
            if let Some(id) = computer.id {
                store.next_id = store.next_id.max(id.get() + 1);
            }
        }
        store.computers = computers;
    }

    pub fn seed_companies(&self, companies: Vec<Company>) {
        self.lock().companies = companies;
    }

    pub fn computers(&self) -> Vec<Computer> {
        self.lock().computers.clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, CatalogStore> {
        match self.store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_request(store: &Arc<Mutex<CatalogStore>>, mut request: tiny_http::Request) {
    let method = request.method().clone();
    let url = request.url().to_owned();

    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    let mut store = match store.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    store.requests.push(format!("{method} {url}"));

    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url.as_str(), None),
    };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let response = match (&method, segments.as_slice()) {
        (Method::Get, ["api", "computers"]) => list_computers(&store, query),
        (Method::Post, ["api", "computers"]) => create_computer(&mut store, &body),
        (Method::Get, ["api", "computers", id]) => get_computer(&store, id),
        (Method::Put, ["api", "computers", id]) => update_computer(&mut store, id, &body),
        (Method::Delete, ["api", "computers", id]) => delete_computer(&mut store, id),
        (Method::Get, ["api", "companies"]) => json_response(200, &store.companies),
        _ => problem_response(404, "Not Found", &format!("no route for {url}")),
    };
    drop(store);

    let _ = request.respond(response);
}

fn list_computers(store: &CatalogStore, query: Option<&str>) -> Response<std::io::Cursor<Vec<u8>>> {
    let sort = query
        .and_then(|query| query.strip_prefix("sort="))
        .and_then(SortSpec::parse)
        .unwrap_or_default();

    let mut computers = store.computers.clone();
    computers.sort_by(|left, right| compare_computers(left, right, sort));
    json_response(200, &computers)
}

fn compare_computers(left: &Computer, right: &Computer, sort: SortSpec) -> Ordering {
    let ordering = match sort.field {
        SortField::Id => left.id.cmp(&right.id),
        SortField::Name => left.name.cmp(&right.name),
        SortField::Introduced => left.introduced.cmp(&right.introduced),
        SortField::Removed => left.removed.cmp(&right.removed),
        SortField::Hardware => left.hardware.cmp(&right.hardware),
        SortField::Software => left.software.cmp(&right.software),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn create_computer(store: &mut CatalogStore, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut computer: Computer = match serde_json::from_str(body) {
        Ok(computer) => computer,
        Err(error) => return problem_response(400, "Bad Request", &error.to_string()),
    };
    if computer.name.trim().is_empty() {
        return problem_response(400, "Bad Request", "name must not be blank");
    }

    computer.id = Some(ComputerId::new(store.next_id));
    store.next_id += 1;
    store.computers.push(computer.clone());
    json_response(201, &computer)
}

fn get_computer(store: &CatalogStore, raw_id: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let Some(id) = parse_id(raw_id) else {
        return problem_response(400, "Bad Request", &format!("invalid id {raw_id:?}"));
    };
    match store.computers.iter().find(|c| c.id == Some(id)) {
        Some(computer) => json_response(200, computer),
        None => problem_response(
            404,
            "Not Found",
            &format!("computer {} does not exist", id.get()),
        ),
    }
}

fn update_computer(
    store: &mut CatalogStore,
    raw_id: &str,
    body: &str,
) -> Response<std::io::Cursor<Vec<u8>>> {
    let Some(id) = parse_id(raw_id) else {
        return problem_response(400, "Bad Request", &format!("invalid id {raw_id:?}"));
    };
    let mut computer: Computer = match serde_json::from_str(body) {
        Ok(computer) => computer,
        Err(error) => return problem_response(400, "Bad Request", &error.to_string()),
    };
    if computer.name.trim().is_empty() {
        return problem_response(400, "Bad Request", "name must not be blank");
    }
    computer.id = Some(id);

    match store.computers.iter_mut().find(|c| c.id == Some(id)) {
        Some(slot) => {
            *slot = computer.clone();
            json_response(200, &computer)
        }
        None => problem_response(
            404,
            "Not Found",
            &format!("computer {} does not exist", id.get()),
        ),
    }
}

fn delete_computer(store: &mut CatalogStore, raw_id: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let Some(id) = parse_id(raw_id) else {
        return problem_response(400, "Bad Request", &format!("invalid id {raw_id:?}"));
    };
    let before = store.computers.len();
    store.computers.retain(|c| c.id != Some(id));
    if store.computers.len() == before {
        return problem_response(
            404,
            "Not Found",
            &format!("computer {} does not exist", id.get()),
        );
    }
    Response::from_string(String::new()).with_status_code(204)
}

fn parse_id(raw: &str) -> Option<ComputerId> {
    raw.parse::<i64>().ok().map(ComputerId::new)
}

fn json_response<T: serde::Serialize>(code: u16, value: &T) -> Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string(value).unwrap_or_else(|_| "null".to_owned());
    Response::from_string(body)
        .with_status_code(code)
        .with_header(json_header("application/json"))
}

fn problem_response(code: u16, title: &str, detail: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::json!({
        "type": "about:blank",
        "title": title,
        "detail": detail,
        "status": code,
    });
    Response::from_string(body.to_string())
        .with_status_code(code)
        .with_header(json_header("application/problem+json"))
}

fn json_header(content_type: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).expect("valid header")
}

pub fn seeded_catalog(seed: u64, count: usize) -> Result<(Vec<Company>, Vec<Computer>)> {
    let mut faker = CatalogFaker::new(seed);
    let companies: Vec<Company> = (0..4).map(|_| faker.company()).collect();
    let computers: Vec<Computer> = (0..count).map(|_| faker.computer(&companies)).collect();
    serde_json::to_string(&computers).context("catalog must serialize")?;
    Ok((companies, computers))
}
