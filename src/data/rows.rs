//! Row parsing for the spreadsheet values grid
//!
//! Maps the raw two-dimensional string grid returned by the values
//! endpoint into [`Customer`] records. The first row is treated as a
//! header and discarded; data rows map positionally in a fixed column
//! order. Header-name lookup is available as a secondary mechanism, but
//! positional mapping is authoritative for record construction.

use crate::data::{Customer, CustomerStatus, PetCategory};

/// Fixed column order of the source sheet.
///
/// Column 0 is the form-submission timestamp; columns 11 and 12 are
/// maintained by hand in the sheet and may be empty.
pub const ROW_COLUMNS: [&str; 13] = [
    "timestamp",
    "owner_name",
    "owner_reading",
    "email",
    "phone",
    "address",
    "pet_name",
    "pet_category",
    "age",
    "weight",
    "notes",
    "created_date",
    "last_visit",
];

const COL_TIMESTAMP: usize = 0;
const COL_OWNER_NAME: usize = 1;
const COL_OWNER_READING: usize = 2;
const COL_EMAIL: usize = 3;
const COL_PHONE: usize = 4;
const COL_ADDRESS: usize = 5;
const COL_PET_NAME: usize = 6;
const COL_PET_CATEGORY: usize = 7;
const COL_AGE: usize = 8;
const COL_WEIGHT: usize = 9;
const COL_NOTES: usize = 10;
const COL_CREATED_DATE: usize = 11;
const COL_LAST_VISIT: usize = 12;

/// Parses a raw values grid into customer records.
///
/// The first row (header) is discarded. Rows missing an owner name or a
/// pet name after trimming are dropped silently. Surviving rows are
/// numbered in order and assigned identifiers `C001..C00N`.
pub fn parse_grid(grid: &[Vec<String>]) -> Vec<Customer> {
    grid.iter()
        .skip(1)
        .filter_map(|r| parse_row(r))
        .enumerate()
        .map(|(i, mut customer)| {
            customer.id = format_id(i + 1);
            customer
        })
        .collect()
}

/// Finds a column index by header name, if the header row contains it.
///
/// Secondary mechanism only; record construction always uses the fixed
/// positional order.
pub fn header_index(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h.trim() == name)
}

/// Formats a 1-based sequence number as a customer id (`C%03d`).
pub fn format_id(n: usize) -> String {
    format!("C{:03}", n)
}

/// Converts a customer back into a 13-column sheet row (write path).
pub fn to_row(customer: &Customer) -> Vec<String> {
    vec![
        String::new(), // timestamp column is owned by the form, never rewritten
        customer.owner_name.clone(),
        customer.owner_reading.clone(),
        customer.email.clone(),
        customer.phone.clone(),
        customer.address.clone(),
        customer.pet_name.clone(),
        customer.pet_category.to_string(),
        customer.age.to_string(),
        customer.weight.to_string(),
        customer.notes.clone(),
        customer.created_date.clone(),
        customer.last_visit.clone().unwrap_or_default(),
    ]
}

/// Parses one data row. Returns `None` when a required field is empty;
/// the caller assigns the positional id afterwards.
fn parse_row(row: &[String]) -> Option<Customer> {
    let owner_name = cell(row, COL_OWNER_NAME);
    let pet_name = cell(row, COL_PET_NAME);
    if owner_name.is_empty() || pet_name.is_empty() {
        return None;
    }

    let created_date = {
        let explicit = cell(row, COL_CREATED_DATE);
        if explicit.is_empty() {
            date_from_timestamp(&cell(row, COL_TIMESTAMP))
        } else {
            explicit
        }
    };

    let last_visit = {
        let v = cell(row, COL_LAST_VISIT);
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    };

    Some(Customer {
        id: String::new(),
        owner_name,
        owner_reading: cell(row, COL_OWNER_READING),
        email: cell(row, COL_EMAIL),
        phone: cell(row, COL_PHONE),
        address: cell(row, COL_ADDRESS),
        pet_name,
        pet_category: PetCategory::parse(&cell(row, COL_PET_CATEGORY)),
        age: cell(row, COL_AGE).parse().unwrap_or(0),
        weight: cell(row, COL_WEIGHT).parse().unwrap_or(0.0),
        notes: cell(row, COL_NOTES),
        created_date,
        last_visit,
        status: CustomerStatus::Active,
    })
}

/// Returns the trimmed cell at `idx`, or an empty string for short rows.
fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Extracts an ISO date from a form timestamp like `2026/01/15 10:30:22`.
fn date_from_timestamp(ts: &str) -> String {
    ts.split_whitespace()
        .next()
        .unwrap_or("")
        .replace('/', "-")
}
