//! The book canon: ordering, titles and the default name vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal prefixes for numbered books ("1 Samuel", "I Samuel", "First Samuel").
const FIRST: &str = r"(?:1|I|1st|First)\s*";
const SECOND: &str = r"(?:2|II|2nd|Second)\s*";
const THIRD: &str = r"(?:3|III|3rd|Third)\s*";

fn plain(pattern: &str) -> String {
    pattern.to_string()
}

fn first(pattern: &str) -> String {
    format!("{FIRST}(?:{pattern})")
}

fn second(pattern: &str) -> String {
    format!("{SECOND}(?:{pattern})")
}

fn third(pattern: &str) -> String {
    format!("{THIRD}(?:{pattern})")
}

macro_rules! canon {
    ($($variant:ident = $index:literal, $title:literal, $long:literal, $pattern:expr;)+) => {
        /// A book of the 66-book Protestant canon, declared in canonical order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Book {
            $(
                #[doc = $title]
                $variant = $index,
            )+
        }

        impl Book {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Short display title ("Genesis", "1 Corinthians").
            pub const fn title(self) -> &'static str {
                match self {
                    $(Self::$variant => $title,)+
                }
            }

            /// Long display title ("The First Book of Moses, Called Genesis").
            pub const fn long_title(self) -> &'static str {
                match self {
                    $(Self::$variant => $long,)+
                }
            }

            /// Case-insensitive regex fragment matching this book's names and abbreviations.
            pub fn default_pattern(self) -> String {
                match self {
                    $(Self::$variant => $pattern,)+
                }
            }
        }
    };
}

canon! {
    Genesis = 1, "Genesis", "The First Book of Moses, Called Genesis", plain("Gen(?:esis)?|Gn");
    Exodus = 2, "Exodus", "The Second Book of Moses, Called Exodus", plain("Exod(?:us)?|Exo");
    Leviticus = 3, "Leviticus", "The Third Book of Moses, Called Leviticus", plain("Lev(?:iticus)?|Lv");
    Numbers = 4, "Numbers", "The Fourth Book of Moses, Called Numbers", plain("Num(?:bers)?|Nm");
    Deuteronomy = 5, "Deuteronomy", "The Fifth Book of Moses, Called Deuteronomy", plain("Deut(?:eronomy)?|Dt");
    Joshua = 6, "Joshua", "The Book of Joshua", plain("Josh(?:ua)?");
    Judges = 7, "Judges", "The Book of Judges", plain("Judg(?:es)?|Jdg");
    Ruth = 8, "Ruth", "The Book of Ruth", plain("Ruth|Rth");
    FirstSamuel = 9, "1 Samuel", "The First Book of Samuel", first("Sam(?:uel)?|Sm");
    SecondSamuel = 10, "2 Samuel", "The Second Book of Samuel", second("Sam(?:uel)?|Sm");
    FirstKings = 11, "1 Kings", "The First Book of the Kings", first("K(?:in)?gs");
    SecondKings = 12, "2 Kings", "The Second Book of the Kings", second("K(?:in)?gs");
    FirstChronicles = 13, "1 Chronicles", "The First Book of the Chronicles", first("Chr(?:on(?:icles)?)?");
    SecondChronicles = 14, "2 Chronicles", "The Second Book of the Chronicles", second("Chr(?:on(?:icles)?)?");
    Ezra = 15, "Ezra", "Ezra", plain("Ezra|Ezr");
    Nehemiah = 16, "Nehemiah", "The Book of Nehemiah", plain("Neh(?:emiah)?");
    Esther = 17, "Esther", "The Book of Esther", plain("Esth(?:er)?");
    Job = 18, "Job", "The Book of Job", plain("Job");
    Psalms = 19, "Psalms", "The Book of Psalms", plain("Psalms?|Pss?|Psa|Pslm");
    Proverbs = 20, "Proverbs", "The Proverbs", plain("Prov(?:erbs)?|Prv");
    Ecclesiastes = 21, "Ecclesiastes", "Ecclesiastes, or, the Preacher", plain("Eccl(?:es(?:iastes)?)?|Ecc|Qoh(?:eleth)?");
    SongOfSongs = 22, "Song of Songs", "The Song of Solomon", plain(r"Song\s+of\s+(?:Songs|Solomon)|Canticles|Cant");
    Isaiah = 23, "Isaiah", "The Book of the Prophet Isaiah", plain("Isa(?:iah)?");
    Jeremiah = 24, "Jeremiah", "The Book of the Prophet Jeremiah", plain("Jer(?:emiah)?");
    Lamentations = 25, "Lamentations", "The Lamentations of Jeremiah", plain("Lam(?:entations)?");
    Ezekiel = 26, "Ezekiel", "The Book of the Prophet Ezekiel", plain("Ezek(?:iel)?|Ezk");
    Daniel = 27, "Daniel", "The Book of Daniel", plain("Dan(?:iel)?|Dn");
    Hosea = 28, "Hosea", "Hosea", plain("Hos(?:ea)?");
    Joel = 29, "Joel", "Joel", plain("Joel|Jl");
    Amos = 30, "Amos", "Amos", plain("Amos");
    Obadiah = 31, "Obadiah", "Obadiah", plain("Obad(?:iah)?");
    Jonah = 32, "Jonah", "Jonah", plain("Jonah|Jnh");
    Micah = 33, "Micah", "Micah", plain("Mic(?:ah)?");
    Nahum = 34, "Nahum", "Nahum", plain("Nah(?:um)?");
    Habakkuk = 35, "Habakkuk", "Habakkuk", plain("Hab(?:akkuk)?");
    Zephaniah = 36, "Zephaniah", "Zephaniah", plain("Zeph(?:aniah)?");
    Haggai = 37, "Haggai", "Haggai", plain("Hag(?:gai)?");
    Zechariah = 38, "Zechariah", "Zechariah", plain("Zech(?:ariah)?");
    Malachi = 39, "Malachi", "Malachi", plain("Mal(?:achi)?");
    Matthew = 40, "Matthew", "The Gospel According to Saint Matthew", plain("Matt(?:hew)?|Mt");
    Mark = 41, "Mark", "The Gospel According to Saint Mark", plain("Mark|Mk|Mrk");
    Luke = 42, "Luke", "The Gospel According to Saint Luke", plain("Luke|Lk");
    John = 43, "John", "The Gospel According to Saint John", plain("John|Jn|Jhn");
    Acts = 44, "Acts", "The Acts of the Apostles", plain("Acts");
    Romans = 45, "Romans", "The Epistle of Paul the Apostle to the Romans", plain("Rom(?:ans)?");
    FirstCorinthians = 46, "1 Corinthians", "The First Epistle of Paul the Apostle to the Corinthians", first("Cor(?:inthians)?");
    SecondCorinthians = 47, "2 Corinthians", "The Second Epistle of Paul the Apostle to the Corinthians", second("Cor(?:inthians)?");
    Galatians = 48, "Galatians", "The Epistle of Paul the Apostle to the Galatians", plain("Gal(?:atians)?");
    Ephesians = 49, "Ephesians", "The Epistle of Paul the Apostle to the Ephesians", plain("Eph(?:esians)?");
    Philippians = 50, "Philippians", "The Epistle of Paul the Apostle to the Philippians", plain("Phil(?:ippians)?|Php");
    Colossians = 51, "Colossians", "The Epistle of Paul the Apostle to the Colossians", plain("Col(?:ossians)?");
    FirstThessalonians = 52, "1 Thessalonians", "The First Epistle of Paul the Apostle to the Thessalonians", first("Thess(?:alonians)?");
    SecondThessalonians = 53, "2 Thessalonians", "The Second Epistle of Paul the Apostle to the Thessalonians", second("Thess(?:alonians)?");
    FirstTimothy = 54, "1 Timothy", "The First Epistle of Paul the Apostle to Timothy", first("Tim(?:othy)?");
    SecondTimothy = 55, "2 Timothy", "The Second Epistle of Paul the Apostle to Timothy", second("Tim(?:othy)?");
    Titus = 56, "Titus", "The Epistle of Paul to Titus", plain("Tit(?:us)?");
    Philemon = 57, "Philemon", "The Epistle of Paul to Philemon", plain("Philem(?:on)?|Phlm|Phm");
    Hebrews = 58, "Hebrews", "The Epistle of Paul the Apostle to the Hebrews", plain("Heb(?:rews)?");
    James = 59, "James", "The General Epistle of James", plain("James|Jas");
    FirstPeter = 60, "1 Peter", "The First Epistle General of Peter", first("Pet(?:er)?|Pt");
    SecondPeter = 61, "2 Peter", "The Second Epistle General of Peter", second("Pet(?:er)?|Pt");
    FirstJohn = 62, "1 John", "The First Epistle General of John", first("John|Jn");
    SecondJohn = 63, "2 John", "The Second Epistle of John", second("John|Jn");
    ThirdJohn = 64, "3 John", "The Third Epistle of John", third("John|Jn");
    Jude = 65, "Jude", "The General Epistle of Jude", plain("Jude");
    Revelation = 66, "Revelation", "The Revelation of Saint John the Divine", plain("Rev(?:elations?)?");
}

impl Book {
    /// Every book in canonical order.
    pub const fn all() -> &'static [Self] {
        Self::ALL
    }

    /// 1-based canonical index (Genesis = 1, Revelation = 66).
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Book at a 1-based canonical index.
    pub fn from_index(index: u32) -> Option<Self> {
        let position = usize::try_from(index).ok()?.checked_sub(1)?;
        Self::ALL.get(position).copied()
    }

    /// The following book in canonical order.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use regex::Regex;

    #[test]
    fn test_canonical_order() {
        assert_eq!(Book::all().len(), 66);
        assert_eq!(Book::Genesis.index(), 1);
        assert_eq!(Book::Matthew.index(), 40);
        assert_eq!(Book::Luke.index(), 42);
        assert_eq!(Book::Revelation.index(), 66);
        assert!(Book::Malachi < Book::Matthew);
        for (i, book) in Book::all().iter().enumerate() {
            assert_eq!(Book::from_index(u32::try_from(i + 1).unwrap()), Some(*book));
        }
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert_eq!(Book::from_index(0), None);
        assert_eq!(Book::from_index(67), None);
        assert_eq!(Book::Revelation.next(), None);
        assert_eq!(Book::Malachi.next(), Some(Book::Matthew));
    }

    #[test]
    fn test_titles() {
        assert_eq!(Book::FirstCorinthians.title(), "1 Corinthians");
        assert_eq!(Book::Psalms.to_string(), "Psalms");
        assert_eq!(Book::Genesis.long_title(), "The First Book of Moses, Called Genesis");
    }

    #[test]
    fn test_default_patterns_match_titles() {
        for book in Book::all() {
            let re = Regex::new(&format!("(?i)^(?:{})$", book.default_pattern())).unwrap();
            assert!(re.is_match(book.title()), "{} does not match its own title", book.title());
        }
    }

    #[test]
    fn test_ordinal_variants() {
        let re = Regex::new(&format!("(?i)^(?:{})$", Book::FirstCorinthians.default_pattern())).unwrap();
        for name in ["1 Corinthians", "1Cor", "I Corinthians", "First Corinthians", "1st Cor"] {
            assert!(re.is_match(name), "{name}");
        }
        assert!(!re.is_match("2 Corinthians"));
    }
}
