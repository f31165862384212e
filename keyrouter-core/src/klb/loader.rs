use crate::types::{InfoEntry, KlbFile, KlbHeader, OverrideEntry, KLB_HEADER_SIZE, KLB_MAGIC, KLB_MAJOR_VERSION};
use super::error::{KlbError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

pub struct KlbLoader;

impl KlbLoader {
    /// Load a KLB file from binary data
    pub fn load(data: &[u8]) -> Result<KlbFile> {
        let mut cursor = Cursor::new(data);

        let header = Self::read_header(&mut cursor)?;

        if header.major_version != KLB_MAJOR_VERSION {
            return Err(KlbError::UnsupportedVersion {
                major: header.major_version,
                minor: header.minor_version,
            });
        }

        if header.layer_count == 0 || header.layer_count > 32 || header.rows == 0 || header.cols == 0 {
            return Err(KlbError::InvalidDimensions {
                layers: header.layer_count,
                rows: header.rows,
                cols: header.cols,
            });
        }

        let info = Self::read_info(&mut cursor, header.info_count as usize)?;

        let cells = header.rows as usize * header.cols as usize;
        let keymap = Self::read_keymap(&mut cursor, header.layer_count as usize * cells)?;

        let mut leds = vec![0u8; cells];
        cursor.read_exact(&mut leds)?;

        let overrides = Self::read_overrides(&mut cursor, header.override_count as usize)?;

        let remaining = data.len() - cursor.position() as usize;
        if remaining > 0 {
            return Err(KlbError::TrailingData(remaining));
        }

        Ok(KlbFile {
            header,
            info,
            keymap,
            leds,
            overrides,
        })
    }

    /// Read file header
    fn read_header(cursor: &mut Cursor<&[u8]>) -> Result<KlbHeader> {
        if cursor.get_ref().len() < KLB_HEADER_SIZE {
            return Err(KlbError::FileTooSmall(cursor.get_ref().len()));
        }

        let mut magic_code = [0u8; 4];
        cursor.read_exact(&mut magic_code)?;

        if magic_code != KLB_MAGIC {
            return Err(KlbError::InvalidMagicCode(magic_code));
        }

        let major_version = cursor.read_u8()?;
        let minor_version = cursor.read_u8()?;
        let layer_count = cursor.read_u8()?;
        let rows = cursor.read_u8()?;
        let cols = cursor.read_u8()?;
        let padding = cursor.read_u8()?;
        let info_count = cursor.read_u16::<LittleEndian>()?;
        let override_count = cursor.read_u16::<LittleEndian>()?;

        Ok(KlbHeader {
            magic_code,
            major_version,
            minor_version,
            layer_count,
            rows,
            cols,
            padding,
            info_count,
            override_count,
        })
    }

    /// Read info section
    fn read_info(cursor: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<InfoEntry>> {
        let mut info = Vec::with_capacity(count);

        for _ in 0..count {
            let mut id = [0u8; 4];
            cursor.read_exact(&mut id)?;

            let length = cursor.read_u16::<LittleEndian>()? as usize;
            let mut data = vec![0u8; length];
            cursor.read_exact(&mut data)?;

            info.push(InfoEntry { id, data });
        }

        Ok(info)
    }

    fn read_keymap(cursor: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<u16>> {
        let mut keymap = vec![0u16; count];
        cursor.read_u16_into::<LittleEndian>(&mut keymap)?;
        Ok(keymap)
    }

    fn read_overrides(cursor: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<OverrideEntry>> {
        let mut overrides = Vec::with_capacity(count);

        for _ in 0..count {
            let mods = cursor.read_u8()?;
            let trigger = cursor.read_u16::<LittleEndian>()?;
            let replacement = cursor.read_u16::<LittleEndian>()?;
            let layers = cursor.read_u32::<LittleEndian>()?;
            overrides.push(OverrideEntry {
                mods,
                trigger,
                replacement,
                layers,
            });
        }

        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(layers: u8, rows: u8, cols: u8) -> Vec<u8> {
        let mut bytes = b"KLRB".to_vec();
        bytes.extend_from_slice(&[1, 0, layers, rows, cols, 0, 0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn test_load_minimal() {
        let mut data = header_bytes(1, 1, 2);
        data.extend_from_slice(&[0x29, 0x00, 0x01, 0x00]);
        data.extend_from_slice(&[0, 255]);

        let file = KlbLoader::load(&data).unwrap();
        assert_eq!(file.keymap, vec![0x0029, 0x0001]);
        assert_eq!(file.leds, vec![0, 255]);
        assert!(file.overrides.is_empty());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut data = header_bytes(1, 1, 1);
        data[0] = b'X';
        assert!(matches!(KlbLoader::load(&data), Err(KlbError::InvalidMagicCode(_))));
    }

    #[test]
    fn test_rejects_zero_layers() {
        let data = header_bytes(0, 6, 17);
        assert!(matches!(
            KlbLoader::load(&data),
            Err(KlbError::InvalidDimensions { layers: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_keymap() {
        let mut data = header_bytes(1, 2, 2);
        data.extend_from_slice(&[0x04, 0x00]);
        assert!(matches!(KlbLoader::load(&data), Err(KlbError::Io(_))));
    }
}
