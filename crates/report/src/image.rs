//! Minimal JPEG header reading for embedding images as DCTDecode streams.

/// Dimensions and color layout of a baseline or progressive JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JpegInfo {
    pub width: u16,
    pub height: u16,
    pub components: u8,
}

impl JpegInfo {
    pub fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }
}

/// Walk the marker segments up to the first SOFn and read its header.
pub(crate) fn jpeg_info(bytes: &[u8]) -> Option<JpegInfo> {
    if bytes.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    loop {
        while *bytes.get(pos)? != 0xFF {
            pos += 1;
        }
        while *bytes.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *bytes.get(pos)?;
        pos += 1;
        match marker {
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let len = u16::from_be_bytes([*bytes.get(pos)?, *bytes.get(pos + 1)?]) as usize;
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let seg = bytes.get(pos + 2..pos + len)?;
            return Some(JpegInfo {
                height: u16::from_be_bytes([*seg.get(1)?, *seg.get(2)?]),
                width: u16::from_be_bytes([*seg.get(3)?, *seg.get(4)?]),
                components: *seg.get(5)?,
            });
        }
        pos += len;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// SOI, a short APP0, then an SOF0 header for a `width`x`height` image.
    pub fn fake_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, b'J', b'F'];
        out.extend([0xFF, 0xC0, 0x00, 0x0B, 0x08]);
        out.extend(height.to_be_bytes());
        out.extend(width.to_be_bytes());
        out.extend([components, 0x01, 0x11, 0x00]);
        out.extend([0xFF, 0xD9]);
        out
    }

    #[test]
    fn reads_sof_header() {
        let info = jpeg_info(&fake_jpeg(640, 480, 3)).unwrap();
        assert_eq!(info, JpegInfo { width: 640, height: 480, components: 3 });
        assert_eq!(info.color_space(), "DeviceRGB");
        assert_eq!(jpeg_info(&fake_jpeg(1, 1, 1)).unwrap().color_space(), "DeviceGray");
    }

    #[test]
    fn rejects_non_jpeg() {
        assert!(jpeg_info(b"\x89PNG\r\n\x1a\n").is_none());
        assert!(jpeg_info(&[0xFF, 0xD8, 0xFF]).is_none());
    }
}
