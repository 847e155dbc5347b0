//! Static catalog mapping letter identifiers to bucket filenames

use rand::Rng;

use crate::core::Error;

/// Letter-to-model table. The key is the alphabet letter shown to the user,
/// the value is the bucket-relative filename of the 3D model.
pub const ALPHABET: [(&str, &str); 26] = [
    ("A", "apple.glb"),
    ("B", "ball.glb"),
    ("C", "cat.glb"),
    ("D", "dog.glb"),
    ("E", "elephant.glb"),
    ("F", "fox.glb"),
    ("G", "goat.glb"),
    ("H", "hen.glb"),
    ("I", "icecream.glb"),
    ("J", "jug.glb"),
    ("K", "kite.glb"),
    ("L", "lion.glb"),
    ("M", "monkey.glb"),
    ("N", "nest.glb"),
    ("O", "owl.glb"),
    ("P", "parrot.glb"),
    ("Q", "quail.glb"),
    ("R", "rat.glb"),
    ("S", "ship.glb"),
    ("T", "telephone.glb"),
    ("U", "umbrella.glb"),
    ("V", "van.glb"),
    ("W", "watch.glb"),
    ("X", "xylophone.glb"),
    ("Y", "yacht.glb"),
    ("Z", "zebra.glb"),
];

/// Map an identifier to its bucket filename
///
/// # Errors
/// `Error::UnknownAsset` if the identifier is not in the table. No I/O is
/// performed either way.
pub fn asset_key(id: &str) -> Result<&'static str, Error> {
    ALPHABET
        .iter()
        .find(|(letter, _)| *letter == id)
        .map(|(_, key)| *key)
        .ok_or_else(|| Error::UnknownAsset(id.to_string()))
}

/// All letter labels, in table order
pub fn letters() -> impl Iterator<Item = &'static str> {
    ALPHABET.iter().map(|(letter, _)| *letter)
}

/// Pick a uniformly random (letter, filename) entry
pub fn random_entry<R: Rng>(rng: &mut R) -> (&'static str, &'static str) {
    ALPHABET[rng.gen_range(0..ALPHABET.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_asset_key_known() {
        assert_eq!(asset_key("A").unwrap(), "apple.glb");
        assert_eq!(asset_key("Z").unwrap(), "zebra.glb");
    }

    #[test]
    fn test_asset_key_unknown() {
        let err = asset_key("1").unwrap_err();
        assert!(matches!(err, Error::UnknownAsset(id) if id == "1"));
    }

    #[test]
    fn test_letters_count() {
        assert_eq!(letters().count(), 26);
    }

    #[test]
    fn test_random_entry_is_in_table() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let (letter, key) = random_entry(&mut rng);
            assert_eq!(asset_key(letter).unwrap(), key);
        }
    }
}
