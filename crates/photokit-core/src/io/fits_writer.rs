use std::path::Path;

use fitsio::hdu::FitsHdu;
use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;
use crate::io::cfitsio::{write_float, write_history, write_logical};
use crate::io::header::{is_structural, Card, Header, HeaderValue};

/// Writes a single-HDU FITS file with 64-bit float pixels.
pub struct FitsWriter {
    fptr: FitsFile,
    hdu: FitsHdu,
}

impl FitsWriter {
    /// Create (or overwrite) the output file with a primary image of
    /// `(height, width)`.
    pub fn create(path: &Path, shape: (usize, usize)) -> Result<Self> {
        let dimensions = [shape.0, shape.1];
        let description = ImageDescription {
            data_type: ImageType::Double,
            dimensions: &dimensions,
        };
        let mut fptr = FitsFile::create(path)
            .with_custom_primary(&description)
            .overwrite()
            .open()?;
        let hdu = fptr.primary_hdu()?;
        Ok(Self { fptr, hdu })
    }

    /// Write the image, then the caller's cards. cfitsio owns the
    /// structural keywords.
    pub fn write_image(mut self, data: &Array2<f64>, header: &Header) -> Result<()> {
        let pixels: Vec<f64> = data.iter().copied().collect();
        self.hdu.write_image(&mut self.fptr, &pixels)?;
        for card in header.cards().iter().filter(|c| !is_structural(&c.keyword)) {
            self.write_card(card)?;
        }
        Ok(())
    }

    fn write_card(&mut self, card: &Card) -> Result<()> {
        let key = card.keyword.as_str();
        match &card.value {
            Some(HeaderValue::Integer(v)) => self.hdu.write_key(&mut self.fptr, key, *v)?,
            Some(HeaderValue::Text(s)) => self.hdu.write_key(&mut self.fptr, key, s.clone())?,
            Some(HeaderValue::Float(v)) => write_float(&mut self.fptr, key, *v)?,
            Some(HeaderValue::Logical(b)) => write_logical(&mut self.fptr, key, *b)?,
            // cfitsio adds its own COMMENT cards to a new primary header.
            None if key == "HISTORY" => {
                write_history(&mut self.fptr, card.comment.as_deref().unwrap_or(""))?
            }
            None => {}
        }
        Ok(())
    }
}

/// Save a frame to `path`, overwriting any existing file.
pub fn write_fits(path: &Path, frame: &Frame) -> Result<()> {
    FitsWriter::create(path, frame.shape())?.write_image(&frame.data, &frame.header)
}
