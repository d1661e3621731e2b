//! Minimal PLY reader for the point-cloud asset.
//!
//! Only the `vertex` element is kept: positions plus a colour taken from
//! `red/green/blue`, or from the DC spherical-harmonic band (`f_dc_*`) that
//! Gaussian-splat exporters write. Faces and other elements are skipped.

use crate::error::PlyError;
use glam::Vec3;

// zeroth-order SH basis constant used by splat exporters
const SH_C0: f32 = 0.282_094_8;
// cap on up-front allocation so a lying header cannot reserve gigabytes
const MAX_PREALLOC: usize = 1 << 20;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// `x y z r g b` per point, ready for a vertex buffer.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 6);
        for (p, c) in self.positions.iter().zip(&self.colors) {
            out.extend_from_slice(p);
            out.extend_from_slice(c);
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Format {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Scalar {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl Scalar {
    fn parse(name: &str) -> Result<Self, PlyError> {
        Ok(match name {
            "char" | "int8" => Scalar::I8,
            "uchar" | "uint8" => Scalar::U8,
            "short" | "int16" => Scalar::I16,
            "ushort" | "uint16" => Scalar::U16,
            "int" | "int32" => Scalar::I32,
            "uint" | "uint32" => Scalar::U32,
            "float" | "float32" => Scalar::F32,
            "double" | "float64" => Scalar::F64,
            other => return Err(PlyError::UnknownType(other.to_string())),
        })
    }

    /// Divisor that maps an integer colour channel to \[0, 1\].
    fn color_range(self) -> f32 {
        match self {
            Scalar::U8 => u8::MAX as f32,
            Scalar::U16 => u16::MAX as f32,
            Scalar::I8 => i8::MAX as f32,
            Scalar::I16 => i16::MAX as f32,
            Scalar::I32 => i32::MAX as f32,
            Scalar::U32 => u32::MAX as f32,
            Scalar::F32 | Scalar::F64 => 1.0,
        }
    }
}

#[derive(Clone, Debug)]
enum Property {
    Scalar { name: String, ty: Scalar },
    List { count: Scalar, item: Scalar },
}

#[derive(Clone, Debug)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

struct Header {
    format: Format,
    elements: Vec<Element>,
    body_offset: usize,
}

fn parse_header(bytes: &[u8]) -> Result<Header, PlyError> {
    if !bytes.starts_with(b"ply") {
        return Err(PlyError::BadMagic);
    }
    const END: &[u8] = b"end_header";
    let end = bytes
        .windows(END.len())
        .position(|w| w == END)
        .ok_or(PlyError::UnterminatedHeader)?;
    let body_offset = bytes[end..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| end + i + 1)
        .unwrap_or(bytes.len());
    let text = std::str::from_utf8(&bytes[..end])
        .map_err(|_| PlyError::MalformedHeader("header is not valid UTF-8".into()))?;

    let mut format = None;
    let mut elements: Vec<Element> = Vec::new();
    for line in text.lines().skip(1) {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("format") => {
                format = Some(match words.next() {
                    Some("ascii") => Format::Ascii,
                    Some("binary_little_endian") => Format::BinaryLittleEndian,
                    Some("binary_big_endian") => Format::BinaryBigEndian,
                    other => {
                        return Err(PlyError::UnsupportedFormat(
                            other.unwrap_or_default().to_string(),
                        ))
                    }
                });
            }
            Some("element") => {
                let (Some(name), Some(count)) = (words.next(), words.next()) else {
                    return Err(PlyError::MalformedHeader(line.to_string()));
                };
                let count = count
                    .parse::<usize>()
                    .map_err(|_| PlyError::MalformedHeader(line.to_string()))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| PlyError::MalformedHeader(line.to_string()))?;
                let property = match words.next() {
                    Some("list") => {
                        let (Some(count), Some(item), Some(_name)) =
                            (words.next(), words.next(), words.next())
                        else {
                            return Err(PlyError::MalformedHeader(line.to_string()));
                        };
                        Property::List {
                            count: Scalar::parse(count)?,
                            item: Scalar::parse(item)?,
                        }
                    }
                    Some(ty) => {
                        let name = words
                            .next()
                            .ok_or_else(|| PlyError::MalformedHeader(line.to_string()))?;
                        Property::Scalar {
                            name: name.to_string(),
                            ty: Scalar::parse(ty)?,
                        }
                    }
                    None => return Err(PlyError::MalformedHeader(line.to_string())),
                };
                element.properties.push(property);
            }
            Some("comment") | Some("obj_info") | None => {}
            Some(_) => return Err(PlyError::MalformedHeader(line.to_string())),
        }
    }
    let format = format.ok_or_else(|| PlyError::UnsupportedFormat(String::new()))?;
    Ok(Header {
        format,
        elements,
        body_offset,
    })
}

/// Sequential scalar reader over the body.
trait ScalarSource {
    fn read(&mut self, ty: Scalar) -> Result<f64, PlyError>;
}

struct BinarySource<'a> {
    data: &'a [u8],
    pos: usize,
    little_endian: bool,
}

impl BinarySource<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], PlyError> {
        let end = self.pos + N;
        let chunk = self.data.get(self.pos..end).ok_or(PlyError::Truncated)?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        if !self.little_endian {
            out.reverse();
        }
        Ok(out)
    }
}

impl ScalarSource for BinarySource<'_> {
    fn read(&mut self, ty: Scalar) -> Result<f64, PlyError> {
        Ok(match ty {
            Scalar::I8 => i8::from_le_bytes(self.take::<1>()?) as f64,
            Scalar::U8 => u8::from_le_bytes(self.take::<1>()?) as f64,
            Scalar::I16 => i16::from_le_bytes(self.take::<2>()?) as f64,
            Scalar::U16 => u16::from_le_bytes(self.take::<2>()?) as f64,
            Scalar::I32 => i32::from_le_bytes(self.take::<4>()?) as f64,
            Scalar::U32 => u32::from_le_bytes(self.take::<4>()?) as f64,
            Scalar::F32 => f32::from_le_bytes(self.take::<4>()?) as f64,
            Scalar::F64 => f64::from_le_bytes(self.take::<8>()?),
        })
    }
}

struct AsciiSource<'a> {
    tokens: std::str::SplitAsciiWhitespace<'a>,
}

impl ScalarSource for AsciiSource<'_> {
    fn read(&mut self, _ty: Scalar) -> Result<f64, PlyError> {
        let token = self.tokens.next().ok_or(PlyError::Truncated)?;
        token
            .parse::<f64>()
            .map_err(|_| PlyError::InvalidValue(token.to_string()))
    }
}

/// Where each vertex attribute lives in a row of scalar values.
struct VertexLayout {
    position: [usize; 3],
    color: Option<([usize; 3], ColorEncoding)>,
}

#[derive(Clone, Copy)]
enum ColorEncoding {
    Channels([f32; 3]),
    SphericalDc,
}

impl VertexLayout {
    fn resolve(element: &Element) -> Result<Self, PlyError> {
        let find = |wanted: &str| {
            let mut scalar_index = 0;
            for p in &element.properties {
                if let Property::Scalar { name, ty } = p {
                    if name == wanted {
                        return Some((scalar_index, *ty));
                    }
                    scalar_index += 1;
                }
            }
            None
        };
        let x = find("x").ok_or(PlyError::MissingProperty("x"))?.0;
        let y = find("y").ok_or(PlyError::MissingProperty("y"))?.0;
        let z = find("z").ok_or(PlyError::MissingProperty("z"))?.0;

        let rgb = (find("red"), find("green"), find("blue"));
        let dc = (find("f_dc_0"), find("f_dc_1"), find("f_dc_2"));
        let color = match (rgb, dc) {
            ((Some(r), Some(g), Some(b)), _) => Some((
                [r.0, g.0, b.0],
                ColorEncoding::Channels([r.1.color_range(), g.1.color_range(), b.1.color_range()]),
            )),
            (_, (Some(r), Some(g), Some(b))) => Some(([r.0, g.0, b.0], ColorEncoding::SphericalDc)),
            _ => None,
        };
        Ok(Self {
            position: [x, y, z],
            color,
        })
    }

    fn color(&self, row: &[f64]) -> [f32; 3] {
        match self.color {
            None => [1.0; 3],
            Some((idx, ColorEncoding::Channels(range))) => {
                [0, 1, 2].map(|i| (row[idx[i]] as f32 / range[i]).clamp(0.0, 1.0))
            }
            Some((idx, ColorEncoding::SphericalDc)) => {
                [0, 1, 2].map(|i| (0.5 + SH_C0 * row[idx[i]] as f32).clamp(0.0, 1.0))
            }
        }
    }
}

/// Read one row of `element`, keeping scalar values and skipping lists.
fn read_row(
    source: &mut dyn ScalarSource,
    element: &Element,
    row: &mut Vec<f64>,
) -> Result<(), PlyError> {
    row.clear();
    for property in &element.properties {
        match property {
            Property::Scalar { ty, .. } => row.push(source.read(*ty)?),
            Property::List { count, item } => {
                let n = source.read(*count)?;
                if !(0.0..=u32::MAX as f64).contains(&n) {
                    return Err(PlyError::InvalidValue(n.to_string()));
                }
                for _ in 0..n as u32 {
                    source.read(*item)?;
                }
            }
        }
    }
    Ok(())
}

/// Decode a PLY file into a point cloud.
pub fn parse(bytes: &[u8]) -> Result<PointCloud, PlyError> {
    let header = parse_header(bytes)?;
    let body = &bytes[header.body_offset.min(bytes.len())..];

    let ascii_text;
    let mut binary;
    let mut ascii;
    let source: &mut dyn ScalarSource = match header.format {
        Format::Ascii => {
            ascii_text = std::str::from_utf8(body)
                .map_err(|_| PlyError::InvalidValue("non UTF-8 ascii body".into()))?;
            ascii = AsciiSource {
                tokens: ascii_text.split_ascii_whitespace(),
            };
            &mut ascii
        }
        Format::BinaryLittleEndian | Format::BinaryBigEndian => {
            binary = BinarySource {
                data: body,
                pos: 0,
                little_endian: header.format == Format::BinaryLittleEndian,
            };
            &mut binary
        }
    };

    let mut row = Vec::new();
    for element in &header.elements {
        if element.name != "vertex" {
            // rows without properties occupy no bytes
            if element.properties.is_empty() {
                continue;
            }
            for _ in 0..element.count {
                read_row(source, element, &mut row)?;
            }
            continue;
        }
        let layout = VertexLayout::resolve(element)?;
        let mut cloud = PointCloud {
            positions: Vec::with_capacity(element.count.min(MAX_PREALLOC)),
            colors: Vec::with_capacity(element.count.min(MAX_PREALLOC)),
        };
        for _ in 0..element.count {
            read_row(source, element, &mut row)?;
            cloud
                .positions
                .push(layout.position.map(|i| row[i] as f32));
            cloud.colors.push(layout.color(&row));
        }
        log::info!(
            "[ply] {} points ({:?}, colour: {})",
            cloud.len(),
            header.format,
            layout.color.is_some()
        );
        return Ok(cloud);
    }
    Err(PlyError::MissingVertexElement)
}
