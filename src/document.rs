//! # Document Reading
//!
//! Extracts raw fixes from GPX-shaped documents.
//!
//! ## Shapes
//! - Route: `<gpx><rte>[<name>] <rtept lat lon>[<ele>][<name>]</rtept>...</rte></gpx>`
//! - Track: `<gpx><trk>[<name>] <trkseg>[<name>] <trkpt>...</trkseg>...</trk></gpx>`, where
//!   each `<trkpt lat lon>` holds `[<ele>][<name>]<time>`
//!
//! Track segments are concatenated in document order and their names dropped,
//! giving one flat fix sequence.
//! Points directly under `<trk>` are read first. `<time>` holds integer seconds or an RFC 3339
//! timestamp.
//!
//! Any missing required element or attribute fails the whole read: no
//! partial document is ever returned.

use std::path::Path;

use chrono::DateTime;
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{GpsError, Result};
use crate::ingest::RawFix;
use crate::Position;

/// Fixes and entity name extracted from a document, before any merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    pub name: Option<String>,
    pub fixes: Vec<RawFix>,
}

/// Read a file into memory.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| GpsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract the first `<rte>` of a document.
pub fn read_route(source: &str) -> Result<RawDocument> {
    let root = parse_tree(source)?;
    let route = root.require_child("rte")?;

    let fixes = route
        .children_named("rtept")
        .map(|point| read_fix(point, false))
        .collect::<Result<Vec<_>>>()?;

    debug!("Read {} route points", fixes.len());
    Ok(RawDocument { name: route.child_text("name"), fixes })
}

/// Extract the first `<trk>` of a document, flattening its segments.
///
/// Points placed directly under `<trk>` come first, followed by the contents
/// of each `<trkseg>` in document order. A track with neither is rejected.
pub fn read_track(source: &str) -> Result<RawDocument> {
    let root = parse_tree(source)?;
    let track = root.require_child("trk")?;

    if track.child("trkpt").is_none() && track.child("trkseg").is_none() {
        return Err(GpsError::MissingElement("trkseg"));
    }

    let segments = track.children_named("trkseg");
    let fixes = track
        .children_named("trkpt")
        .chain(segments.flat_map(|segment| segment.children_named("trkpt")))
        .map(|point| read_fix(point, true))
        .collect::<Result<Vec<_>>>()?;

    debug!("Read {} track points", fixes.len());
    Ok(RawDocument { name: track.child_text("name"), fixes })
}

fn read_fix(point: &Element, timed: bool) -> Result<RawFix> {
    let lat = point.attribute("lat").ok_or(GpsError::MissingAttribute("lat"))?;
    let lon = point.attribute("lon").ok_or(GpsError::MissingAttribute("lon"))?;

    let latitude = parse_number("lat", lat)?;
    let longitude = parse_number("lon", lon)?;
    let elevation = match point.child("ele") {
        Some(ele) => parse_number("ele", ele.text())?,
        None => 0.0,
    };

    let position = Position::with_elevation(latitude, longitude, elevation);
    if !position.is_valid() {
        let (field, value) = if (-90.0..=90.0).contains(&latitude) {
            ("lon", lon)
        } else {
            ("lat", lat)
        };
        return Err(GpsError::InvalidNumber { field, value: value.to_string() });
    }

    let mut fix = RawFix::new(position);
    fix.name = point.child_text("name");

    if timed {
        let time = point.child("time").ok_or(GpsError::MissingElement("time"))?;
        fix.timestamp = Some(parse_timestamp(time.text())?);
    }

    Ok(fix)
}

fn parse_number(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GpsError::InvalidNumber { field, value: value.to_string() })
}

/// Integer seconds, or an RFC 3339 date-time converted to Unix seconds.
pub fn parse_timestamp(text: &str) -> Result<i64> {
    let text = text.trim();
    if let Ok(seconds) = text.parse::<i64>() {
        return Ok(seconds);
    }

    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.timestamp())
        .map_err(|_| GpsError::InvalidTimestamp(text.to_string()))
}

// =============================================================================
// Element Tree
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| GpsError::Xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| GpsError::Xml(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self { name, attributes, ..Default::default() })
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn require_child(&self, name: &'static str) -> Result<&Element> {
        self.child(name).ok_or(GpsError::MissingElement(name))
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn text(&self) -> &str {
        self.text.trim()
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text().to_string())
    }
}

/// Parse the document into an element tree rooted at `<gpx>`.
fn parse_tree(source: &str) -> Result<Element> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            GpsError::Xml(format!("error at position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Eof => break,
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| GpsError::Xml(e.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(GpsError::Xml(format!("unclosed '{}' element", open.name)));
    }

    match root {
        Some(root) if root.name == "gpx" => Ok(root),
        _ => Err(GpsError::MissingElement("gpx")),
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
