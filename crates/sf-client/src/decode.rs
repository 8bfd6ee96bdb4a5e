//! Response decoding shared by every API surface.
//!
//! A response is checked against the set of statuses the endpoint documents
//! as success, then its body is decoded in the format the endpoint speaks.
//! Anything else becomes a classified [`Error`]: `UnexpectedStatus` for the
//! wrong status, `Decode` for a body that does not parse, `SoapFault` for a
//! SOAP fault. Raw status and body are kept on every failure.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{DecodeFailure, Error, ErrorKind, Result, SoapFaultClass};
use crate::response::Response;
use crate::xml::XmlElement;

/// One CSV data row keyed by header name.
pub type Row = BTreeMap<String, String>;

const INVALID_SESSION_MARKER: &str = "INVALID_SESSION_ID";

/// Body format an endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat<'a> {
    /// A JSON document.
    Json,
    /// A SOAP envelope; the result is read from `Body/<operation>Response/result`.
    Soap { operation: &'a str },
    /// Headered CSV.
    Csv,
    /// No body expected (e.g. 204).
    Empty,
}

/// A decoded body.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(serde_json::Value),
    Soap(XmlElement),
    Csv(Vec<Row>),
    Empty,
}

/// Decode a response in the given format.
///
/// `success` lists the statuses the endpoint documents as success. SOAP
/// responses are additionally treated as faults whenever the body carries a
/// `faultcode` element, whatever the status. Every typed helper below goes
/// through here.
pub fn decode(response: &Response, success: &[u16], format: ResponseFormat<'_>) -> Result<Payload> {
    match format {
        ResponseFormat::Json => {
            expect_status(response, success)?;
            if response.body().iter().all(u8::is_ascii_whitespace) {
                return Err(Error::decode(
                    DecodeFailure::EmptyPayload,
                    response.status(),
                    String::new(),
                ));
            }
            response.json().map(Payload::Json)
        }
        ResponseFormat::Soap { operation } => {
            soap_result(response, success, operation).map(Payload::Soap)
        }
        ResponseFormat::Csv => {
            expect_status(response, success)?;
            let text = response.text();
            parse_csv(&text)
                .map(Payload::Csv)
                .map_err(|failure| Error::decode(failure, response.status(), text))
        }
        ResponseFormat::Empty => expect_status(response, success).map(|()| Payload::Empty),
    }
}

/// Fail with `UnexpectedStatus` unless the status is in `success`.
pub fn expect_status(response: &Response, success: &[u16]) -> Result<()> {
    if success.contains(&response.status()) {
        Ok(())
    } else {
        Err(Error::unexpected_status(response.status(), response.text()))
    }
}

/// Check the status and deserialize a JSON body.
pub fn decode_json<T: DeserializeOwned>(response: &Response, success: &[u16]) -> Result<T> {
    match decode(response, success, ResponseFormat::Json)? {
        Payload::Json(value) => serde_json::from_value(value).map_err(|e| {
            Error::decode(
                DecodeFailure::Json(e.to_string()),
                response.status(),
                response.text(),
            )
        }),
        _ => Err(mismatched(response, "JSON")),
    }
}

/// Check the status and parse a headered CSV body into rows.
pub fn decode_csv(response: &Response, success: &[u16]) -> Result<Vec<Row>> {
    match decode(response, success, ResponseFormat::Csv)? {
        Payload::Csv(rows) => Ok(rows),
        _ => Err(mismatched(response, "CSV")),
    }
}

fn mismatched(response: &Response, expected: &str) -> Error {
    Error::decode(
        DecodeFailure::UnknownValue(format!("payload is not {expected}")),
        response.status(),
        response.text(),
    )
}

/// Parse headered CSV into rows keyed by header.
///
/// A body without a header is `EmptyPayload`; a header with no data rows is
/// an empty list. Rows are never padded or truncated: a column count that
/// differs from the header is `MalformedRow`.
pub fn parse_csv(text: &str) -> std::result::Result<Vec<Row>, DecodeFailure> {
    if text.trim().is_empty() {
        return Err(DecodeFailure::EmptyPayload);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_failure)?.clone();
    if headers.is_empty() {
        return Err(DecodeFailure::EmptyPayload);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_failure)?;
        if record.len() != headers.len() {
            return Err(DecodeFailure::MalformedRow {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        );
    }

    Ok(rows)
}

fn csv_failure(err: csv::Error) -> DecodeFailure {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => DecodeFailure::MalformedRow {
            line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => DecodeFailure::Csv(err.to_string()),
    }
}

/// Decode a SOAP response and return the `result` element of `operation`.
///
/// Fault rule: a body containing a `faultcode` element, or a status of 400
/// and above, is inspected for a `Fault`. If one is present the error is
/// `SoapFault` (sub-classified `InvalidSession` when the code or string
/// names `INVALID_SESSION_ID`); otherwise an error status becomes
/// `UnexpectedStatus`.
pub fn decode_soap(response: &Response, success: &[u16], operation: &str) -> Result<XmlElement> {
    match decode(response, success, ResponseFormat::Soap { operation })? {
        Payload::Soap(result) => Ok(result),
        _ => Err(mismatched(response, "SOAP")),
    }
}

fn soap_result(response: &Response, success: &[u16], operation: &str) -> Result<XmlElement> {
    let status = response.status();
    let text = response.text();

    if status >= 400 || text.contains("faultcode>") {
        return Err(soap_failure(status, text));
    }

    if !success.contains(&status) {
        return Err(Error::unexpected_status(status, text));
    }

    let root = XmlElement::parse(&text).map_err(|f| Error::decode(f, status, text.clone()))?;
    let response_name = format!("{operation}Response");
    root.path(&["Body", &response_name, "result"])
        .cloned()
        .ok_or_else(|| {
            Error::decode(
                DecodeFailure::MissingElement(format!("Body/{response_name}/result")),
                status,
                text,
            )
        })
}

fn soap_failure(status: u16, text: String) -> Error {
    let fault = XmlElement::parse(&text)
        .ok()
        .and_then(|root| root.find("Fault").cloned());

    match fault {
        Some(fault) => {
            let fault_code = fault.string_of("faultcode");
            let fault_string = fault.string_of("faultstring");
            let class = if fault_code.contains(INVALID_SESSION_MARKER)
                || fault_string.contains(INVALID_SESSION_MARKER)
            {
                SoapFaultClass::InvalidSession
            } else {
                SoapFaultClass::Generic
            };
            warn!(status, fault_code = %fault_code, ?class, "SOAP fault");
            Error::new(ErrorKind::SoapFault {
                class,
                fault_code,
                fault_string,
            })
        }
        None if status >= 400 => Error::unexpected_status(status, text),
        None => Error::decode(
            DecodeFailure::Xml("fault marker present but no Fault element".to_string()),
            status,
            text,
        ),
    }
}
