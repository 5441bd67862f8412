use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Normalize free text for matching and vectorization: NFKC + lowercase,
/// delete ASCII punctuation (deleted, not replaced, so tokens touching a
/// punctuation character with no space fuse), split on whitespace, drop
/// stopwords, reduce each token to its base form, rejoin with single spaces.
///
/// Total over any input; empty input yields the empty string. Idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    let stripped: String = lowered.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    stripped
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(|token| STEMMER.stem(token).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
