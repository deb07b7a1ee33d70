use std::path::Path;

use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::images::ImageType;
use fitsio::FitsFile;
use ndarray::Array2;
use tracing::debug;

use crate::error::{PhotoError, Result};
use crate::frame::Frame;
use crate::io::cfitsio::{keyword_at, keyword_count, value_kind, RawKeyword, ValueKind};
use crate::io::header::{is_commentary, Card, Header, HeaderValue};

/// Layout of the primary image as reported by cfitsio.
#[derive(Clone, Debug)]
pub struct ImageLayout {
    pub bitpix: i64,
    pub width: usize,
    pub height: usize,
    /// Number of image planes, 1 for plain 2D images.
    pub planes: usize,
}

impl ImageLayout {
    fn from_hdu(info: &HduInfo) -> Result<Self> {
        let (shape, image_type) = match info {
            HduInfo::ImageInfo { shape, image_type } => (shape, image_type),
            _ => {
                return Err(PhotoError::InvalidFits(
                    "Primary HDU is not an image".into(),
                ))
            }
        };
        if shape.len() < 2 {
            return Err(PhotoError::InvalidFits(
                "Primary HDU contains no image data".into(),
            ));
        }

        // cfitsio reports the shape slowest axis first: [.., NAXIS2, NAXIS1].
        let n = shape.len();
        let (height, width) = (shape[n - 2], shape[n - 1]);
        if width == 0 || height == 0 {
            return Err(PhotoError::InvalidDimensions { width, height });
        }

        Ok(Self {
            bitpix: bitpix(image_type),
            width,
            height,
            planes: shape[..n - 2].iter().product::<usize>().max(1),
        })
    }
}

/// BITPIX of the stored samples; unsigned types are signed on disk with BZERO.
fn bitpix(image_type: &ImageType) -> i64 {
    match image_type {
        ImageType::UnsignedByte | ImageType::Byte => 8,
        ImageType::Short | ImageType::UnsignedShort => 16,
        ImageType::Long | ImageType::UnsignedLong => 32,
        ImageType::LongLong => 64,
        ImageType::Float => -32,
        ImageType::Double => -64,
    }
}

/// Reader for the primary image of a FITS file.
pub struct FitsReader {
    fptr: FitsFile,
    hdu: FitsHdu,
    pub header: Header,
    pub layout: ImageLayout,
}

impl FitsReader {
    /// Open a FITS file and read its primary header.
    pub fn open(path: &Path) -> Result<Self> {
        // cfitsio reports a missing file as a generic open failure.
        std::fs::metadata(path)?;

        let mut fptr = FitsFile::open(path)?;
        let hdu = fptr.primary_hdu()?;
        let layout = ImageLayout::from_hdu(&hdu.info)?;
        let header = read_cards(&mut fptr, &hdu)?;

        if layout.planes > 1 {
            debug!(planes = layout.planes, "Reading first plane of data cube");
        }

        Ok(Self {
            fptr,
            hdu,
            header,
            layout,
        })
    }

    /// Read the first image plane as physical values. cfitsio applies
    /// BSCALE/BZERO.
    pub fn read_data(&mut self) -> Result<Array2<f64>> {
        let mut pixels: Vec<f64> = self.hdu.read_image(&mut self.fptr)?;
        let (h, w) = (self.layout.height, self.layout.width);
        if pixels.len() < h * w {
            return Err(PhotoError::InvalidFits(format!(
                "Image data truncated: expected {} samples, got {}",
                h * w,
                pixels.len()
            )));
        }
        pixels.truncate(h * w);
        Array2::from_shape_vec((h, w), pixels)
            .map_err(|e| PhotoError::InvalidFits(format!("Cannot shape image data: {e}")))
    }

    pub fn read_frame(mut self) -> Result<Frame> {
        let data = self.read_data()?;
        Ok(Frame::with_header(data, self.header))
    }
}

/// Load the primary image and header of a FITS file.
pub fn load_fits(path: &Path) -> Result<Frame> {
    let reader = FitsReader::open(path)?;
    debug!(
        path = %path.display(),
        width = reader.layout.width,
        height = reader.layout.height,
        bitpix = reader.layout.bitpix,
        "Loaded FITS"
    );
    reader.read_frame()
}

/// Read only the header, without reading pixel data.
pub fn read_header(path: &Path) -> Result<Header> {
    Ok(FitsReader::open(path)?.header)
}

fn read_cards(fptr: &mut FitsFile, hdu: &FitsHdu) -> Result<Header> {
    let mut header = Header::new();
    for n in 1..=keyword_count(fptr)? {
        let raw = keyword_at(fptr, n)?;
        if raw.name.is_empty() && raw.comment.is_empty() {
            continue;
        }
        let value = if is_commentary(&raw.name) || raw.value.is_empty() {
            None
        } else {
            Some(typed_value(fptr, hdu, &raw)?)
        };
        header.push(Card {
            keyword: raw.name,
            value,
            comment: (!raw.comment.is_empty()).then_some(raw.comment),
        });
    }
    Ok(header)
}

fn typed_value(fptr: &mut FitsFile, hdu: &FitsHdu, raw: &RawKeyword) -> Result<HeaderValue> {
    let key = raw.name.as_str();
    Ok(match value_kind(&raw.value)? {
        ValueKind::Text => {
            let text: String = hdu.read_key(fptr, key)?;
            HeaderValue::Text(text.trim_end().to_string())
        }
        ValueKind::Logical => HeaderValue::Logical(raw.value == "T"),
        // Integers wider than 64 bits fall back to a float.
        ValueKind::Integer => match hdu.read_key::<i64>(fptr, key) {
            Ok(v) => HeaderValue::Integer(v),
            Err(_) => HeaderValue::Float(hdu.read_key(fptr, key)?),
        },
        ValueKind::Float => HeaderValue::Float(hdu.read_key(fptr, key)?),
        ValueKind::Other => HeaderValue::Text(raw.value.clone()),
    })
}
