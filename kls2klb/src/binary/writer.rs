use keyrouter_core::*;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

pub struct KlbWriter<W: Write> {
    writer: W,
}

impl<W: Write> KlbWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_klb_file(mut self, klb: &KlbFile) -> std::result::Result<(), KlsError> {
        let cells = klb.header.rows as usize * klb.header.cols as usize;
        if klb.keymap.len() != klb.header.layer_count as usize * cells || klb.leds.len() != cells {
            return Err(KlsError::BinaryWrite(format!(
                "section sizes do not match a {}x{} matrix with {} layers",
                klb.header.rows, klb.header.cols, klb.header.layer_count
            )));
        }

        self.write_header(&klb.header)?;

        for info in &klb.info {
            self.write_info(info)?;
        }

        for &keycode in &klb.keymap {
            self.writer.write_u16::<LittleEndian>(keycode)?;
        }

        self.writer.write_all(&klb.leds)?;

        for entry in &klb.overrides {
            self.write_override(entry)?;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self, header: &KlbHeader) -> std::result::Result<(), KlsError> {
        // Magic code
        self.writer.write_all(&header.magic_code)?;

        // Version
        self.writer.write_u8(header.major_version)?;
        self.writer.write_u8(header.minor_version)?;

        // Dimensions
        self.writer.write_u8(header.layer_count)?;
        self.writer.write_u8(header.rows)?;
        self.writer.write_u8(header.cols)?;
        self.writer.write_u8(0)?;

        // Counts
        self.writer.write_u16::<LittleEndian>(header.info_count)?;
        self.writer.write_u16::<LittleEndian>(header.override_count)?;

        Ok(())
    }

    fn write_info(&mut self, info: &InfoEntry) -> std::result::Result<(), KlsError> {
        let length = u16::try_from(info.data.len()).map_err(|_| {
            KlsError::BinaryWrite(format!(
                "info entry {} is {} bytes long",
                String::from_utf8_lossy(&info.id),
                info.data.len()
            ))
        })?;

        self.writer.write_all(&info.id)?;
        self.writer.write_u16::<LittleEndian>(length)?;
        self.writer.write_all(&info.data)?;

        Ok(())
    }

    fn write_override(&mut self, entry: &OverrideEntry) -> std::result::Result<(), KlsError> {
        self.writer.write_u8(entry.mods)?;
        self.writer.write_u16::<LittleEndian>(entry.trigger)?;
        self.writer.write_u16::<LittleEndian>(entry.replacement)?;
        self.writer.write_u32::<LittleEndian>(entry.layers)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_minimal() {
        let mut klb = KlbFile::new(1, 1, 2);
        klb.keymap = vec![0x0029, 0x0001];
        klb.leds = vec![0, NO_LED];

        let mut buffer = Vec::new();
        KlbWriter::new(&mut buffer).write_klb_file(&klb).unwrap();

        assert_eq!(
            buffer,
            vec![
                b'K', b'L', b'R', b'B', 1, 0, 1, 1, 2, 0, 0, 0, 0, 0,
                0x29, 0x00, 0x01, 0x00,
                0, 255,
            ]
        );
    }

    #[test]
    fn test_written_file_loads_back() {
        let mut klb = KlbFile::new(2, 1, 1);
        klb.keymap = vec![0x0004, 0x0001];
        klb.leds = vec![0];
        klb.add_info(INFO_NAME, b"tiny".to_vec());
        klb.add_override(OverrideEntry {
            mods: 0x44,
            trigger: 0x2F,
            replacement: 0x1625,
            layers: 0x1,
        });

        let mut buffer = Vec::new();
        KlbWriter::new(&mut buffer).write_klb_file(&klb).unwrap();

        let loaded = keyrouter_core::klb::KlbLoader::load(&buffer).unwrap();
        assert_eq!(loaded.info_string(INFO_NAME).as_deref(), Some("tiny"));
        assert_eq!(loaded.overrides, klb.overrides);
    }

    #[test]
    fn test_rejects_short_keymap() {
        let klb = KlbFile::new(1, 6, 17);
        let mut buffer = Vec::new();
        assert!(matches!(
            KlbWriter::new(&mut buffer).write_klb_file(&klb),
            Err(KlsError::BinaryWrite(_))
        ));
    }
}
