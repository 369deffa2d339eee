//! Geo-referencing and texture-path metadata carried in ordinary comment
//! lines. The element/property grammar is never touched: everything here
//! round-trips through the header's comment channel.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::PlyError;
use crate::header::PlyHeader;
use crate::ser::PlyWriter;

const GEO_TAG: &str = "geo";
const TEXTURE_TAG: &str = "TextureFile";

/// Geo-referencing block: a label, an SRID, the bounding box and the
/// offset/scale applied to the stored coordinates.
///
/// Serialized as a single whitespace-delimited comment, so the label must be
/// one token.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMetadata {
    pub label: String,
    pub srid: i32,
    pub bbox: [f64; 6],
    pub offset: [f64; 3],
    pub scale: [f64; 3],
}

impl GeoMetadata {
    /// Render as the structured comment line (without the `comment` keyword).
    pub fn to_comment(&self) -> String {
        let mut out = format!("{GEO_TAG} {} {}", self.label, self.srid);
        for v in self.bbox.iter().chain(&self.offset).chain(&self.scale) {
            let _ = write!(out, " {v}");
        }
        out
    }

    /// Parse a comment line. Returns `Ok(None)` when the comment is not a geo
    /// block at all; a geo block with the wrong field count or malformed
    /// numbers is an error.
    pub fn from_comment(comment: &str) -> Result<Option<Self>, PlyError> {
        let mut tokens = comment.split_whitespace();
        if tokens.next() != Some(GEO_TAG) {
            return Ok(None);
        }

        let fields: Vec<&str> = tokens.collect();
        if fields.len() != 14 {
            return Err(PlyError::InvalidComment(format!(
                "geo comment carries {} fields, expected 14",
                fields.len()
            )));
        }

        let label = fields[0].to_string();
        let srid = fields[1].parse::<i32>()?;

        let mut nums = [0f64; 12];
        for (slot, token) in nums.iter_mut().zip(&fields[2..]) {
            *slot = token.parse::<f64>()?;
        }

        let mut bbox = [0f64; 6];
        bbox.copy_from_slice(&nums[..6]);
        let mut offset = [0f64; 3];
        offset.copy_from_slice(&nums[6..9]);
        let mut scale = [0f64; 3];
        scale.copy_from_slice(&nums[9..12]);

        Ok(Some(Self {
            label,
            srid,
            bbox,
            offset,
            scale,
        }))
    }
}

/// Find the first geo block among a parsed header's comments.
pub fn geo_metadata(header: &PlyHeader) -> Result<Option<GeoMetadata>, PlyError> {
    for comment in &header.comments {
        if let Some(meta) = GeoMetadata::from_comment(comment)? {
            return Ok(Some(meta));
        }
    }
    Ok(None)
}

/// All texture paths declared in a parsed header's comments.
pub fn texture_paths(header: &PlyHeader) -> Vec<String> {
    header
        .comments
        .iter()
        .filter_map(|c| c.strip_prefix(TEXTURE_TAG))
        .map(|rest| rest.trim_start().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Attach a geo block to a writer whose header has not been emitted yet.
pub fn attach_geo_metadata<W: Write>(
    writer: &mut PlyWriter<W>,
    meta: &GeoMetadata,
) -> Result<(), PlyError> {
    writer.add_comment(meta.to_comment())
}

/// Attach one texture path comment.
pub fn attach_texture_path<W: Write>(
    writer: &mut PlyWriter<W>,
    path: &str,
) -> Result<(), PlyError> {
    writer.add_comment(format!("{TEXTURE_TAG} {path}"))
}
