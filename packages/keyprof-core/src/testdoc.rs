//! Synthetic documents for benchmarks and tests.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::value::Record;

/// Language codes sampled into the `lang` field.
pub const LANGS: [&str; 14] = [
    "da", "de", "en", "es", "fi", "fr", "hu", "it", "nl", "pt", "ro", "ru", "sv", "tr",
];

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_STRING_LEN: usize = 10;

/// Random lowercase base-36 string.
pub fn random_string<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Document with a random `lang` and `n` random string fields `fld_0..`.
pub fn test_doc<R: Rng>(rng: &mut R, n: usize) -> Record {
    let mut doc = Record::with_capacity(n + 1);
    let lang = LANGS.choose(rng).copied().unwrap_or("en");
    doc.insert("lang", lang);
    for i in 0..n {
        doc.insert(format!("fld_{}", i), random_string(rng, RANDOM_STRING_LEN));
    }
    doc
}

/// Fixed-shape document `{ f_0: 0, f_1: 1, ... }` used by insert benchmarks.
pub fn bench_doc(fields: usize) -> Record {
    let mut doc = Record::with_capacity(fields + 1);
    for i in 0..fields {
        doc.insert(format!("f_{}", i), i as i64);
    }
    doc
}
