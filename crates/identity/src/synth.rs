//! Deterministic value synthesis.
//!
//! Every synthetic identifier in a profile is a pure function of
//! `(seed, discriminator)`. The hash is a 32-bit polynomial rolling hash
//! (`h = h * 31 + unit`, wrapping) over the UTF-16 code units of the
//! concatenated input. It is chosen for plausibility and stability across
//! implementations, not for unpredictability.

use rand::Rng;

/// 32-bit signed rolling hash over UTF-16 code units.
pub fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Derive the value for one field of a profile.
pub fn derive(seed: &str, discriminator: &str) -> DerivedValue {
    let mut input = String::with_capacity(seed.len() + discriminator.len());
    input.push_str(seed);
    input.push_str(discriminator);
    DerivedValue::from_hash(rolling_hash(&input))
}

/// Generate a fresh opaque seed.
///
/// Layout is `mirage-<base36 millis>-<8 hex>`. The random suffix keeps two
/// seeds minted in the same millisecond apart.
pub fn generate_seed() -> String {
    let millis = mirage_core::now_ms();
    let salt: u32 = rand::thread_rng().gen();
    format!("mirage-{}-{:08x}", to_base36(millis), salt)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// A hash value with the output shapes used across profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedValue {
    hash: i32,
}

impl DerivedValue {
    pub fn from_hash(hash: i32) -> Self {
        Self { hash }
    }

    /// The underlying signed hash.
    pub fn hash(&self) -> i32 {
        self.hash
    }

    /// Absolute value of the hash. `i32::MIN` maps to `2^31`.
    pub fn magnitude(&self) -> u32 {
        self.hash.unsigned_abs()
    }

    /// Lowercase hex of the magnitude, zero-padded to 8 digits.
    fn hex8(&self) -> String {
        format!("{:08x}", self.magnitude())
    }

    /// UUID-v4 shaped string: `xxxxxxxx-xxxx-4xxx-8xxx-xxxxxxxxxxxx`.
    pub fn uuid(&self) -> String {
        let h = self.hex8();
        format!(
            "{}-{}-4{}-8{}-{}{}",
            &h[0..8],
            &h[0..4],
            &h[1..4],
            &h[4..7],
            h,
            &h[0..4]
        )
    }

    /// Six colon-separated uppercase octets built from the zero-padded magnitude.
    pub fn mac(&self) -> String {
        let hex = format!("{:012X}", self.magnitude());
        hex.as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Uppercase hex of the magnitude, zero-padded to at least `width` digits.
    pub fn hex_serial(&self, width: usize) -> String {
        format!("{:0width$X}", self.magnitude(), width = width)
    }

    /// The UUID with dashes stripped, truncated to `len` characters.
    pub fn compact(&self, len: usize) -> String {
        self.uuid().chars().filter(|c| *c != '-').take(len).collect()
    }

    /// Magnitude reduced into `0..modulus`.
    pub fn bounded(&self, modulus: u64) -> u64 {
        if modulus == 0 {
            return 0;
        }
        u64::from(self.magnitude()) % modulus
    }
}

/// Shape checks shared by tests and by the store's load-time sanity pass.
pub mod shape {
    pub fn is_uuid_v4(value: &str) -> bool {
        let parts: Vec<&str> = value.split('-').collect();
        let lens = [8, 4, 4, 4, 12];
        parts.len() == 5
            && parts.iter().zip(lens).all(|(p, l)| {
                p.len() == l && p.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
            })
            && parts[2].starts_with('4')
            && matches!(parts[3].chars().next(), Some('8' | '9' | 'a' | 'b'))
    }

    pub fn is_mac(value: &str) -> bool {
        let octets: Vec<&str> = value.split(':').collect();
        octets.len() == 6
            && octets.iter().all(|o| {
                o.len() == 2 && o.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            })
    }

    pub fn is_hex_serial(value: &str, len: usize) -> bool {
        value.len() == len && value.chars().all(|c| c.is_ascii_hexdigit())
    }
}
