use crate::errors::CoreError;

use super::encryption::{self, KdfParams, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a sealed expense-tracker store.
pub const MAGIC: &[u8; 4] = b"EXTK";

/// Current envelope version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_SIZE: usize = 54;

/// A parsed sealed file.
///
/// Layout:
/// ```text
/// [EXTK: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.memory_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.time_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.parallelism.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&(self.ciphertext.len() as u64).to_le_bytes());
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, CoreError> {
        if data.len() < HEADER_SIZE {
            return Err(CoreError::InvalidFileFormat(
                "File too small to be a sealed store".into(),
            ));
        }

        let mut reader = Reader { data, offset: 0 };

        if reader.take::<4>()? != *MAGIC {
            return Err(CoreError::InvalidFileFormat(
                "Invalid magic bytes: not a sealed store".into(),
            ));
        }

        let version = u16::from_le_bytes(reader.take()?);
        if version == 0 || version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }

        let kdf_params = KdfParams {
            memory_cost: u32::from_le_bytes(reader.take()?),
            time_cost: u32::from_le_bytes(reader.take()?),
            parallelism: u32::from_le_bytes(reader.take()?),
        };
        kdf_params.validate().map_err(CoreError::InvalidFileFormat)?;

        let salt: [u8; SALT_LEN] = reader.take()?;
        let nonce: [u8; NONCE_LEN] = reader.take()?;
        let ciphertext_len = u64::from_le_bytes(reader.take()?);

        let remaining = reader.remaining();
        if (remaining.len() as u64) < ciphertext_len {
            return Err(CoreError::InvalidFileFormat(format!(
                "File truncated: expected {ciphertext_len} bytes of ciphertext, got {}",
                remaining.len()
            )));
        }

        Ok(Self {
            version,
            kdf_params,
            salt,
            nonce,
            ciphertext: remaining[..ciphertext_len as usize].to_vec(),
        })
    }
}

/// True when `data` starts with the sealed-store magic bytes.
pub fn is_sealed(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Encrypt `plaintext` under `password` and wrap it in an envelope.
/// Salt and nonce are fresh on every call.
pub fn seal(plaintext: &[u8], password: &str, kdf_params: KdfParams) -> Result<Vec<u8>, CoreError> {
    let salt = encryption::random_bytes::<SALT_LEN>()?;
    let nonce = encryption::random_bytes::<NONCE_LEN>()?;
    let key = encryption::derive_key(password, &salt, &kdf_params)?;
    let ciphertext = encryption::encrypt(plaintext, &key, &nonce)?;

    Ok(Envelope {
        version: CURRENT_VERSION,
        kdf_params,
        salt,
        nonce,
        ciphertext,
    }
    .encode())
}

/// Parse an envelope and decrypt its payload with `password`.
pub fn open(data: &[u8], password: &str) -> Result<Vec<u8>, CoreError> {
    let envelope = Envelope::decode(data)?;
    let key = encryption::derive_key(password, &envelope.salt, &envelope.kdf_params)?;
    encryption::decrypt(&envelope.ciphertext, &key, &envelope.nonce)
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("Unexpected end of header".into()))?;
        self.offset = end;
        Ok(bytes)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}
