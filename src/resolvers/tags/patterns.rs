//! Pattern tables for the first two cascade stages.
//!
//! Every pattern maps to a fixed tag tuple. Names are checked against the
//! active taxonomy when applied, so a custom vocabulary silently drops
//! names it does not define.

#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

/// A regex mapped to a fixed set of taxonomy names.
#[derive(Debug)]
pub struct TagPattern {
    /// The regex pattern to match (case-insensitive).
    pub pattern: Regex,
    /// Confidence reported when this pattern matches.
    pub confidence: f32,
    /// Primary names added on a match.
    pub primary: &'static [&'static str],
    /// Secondary names added on a match.
    pub secondary: &'static [&'static str],
    /// Interest names added on a match.
    pub interests: &'static [&'static str],
    /// Human-readable description.
    pub description: &'static str,
}

type PatternRow = (
    &'static str,
    f32,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
    &'static str,
);

fn compile(rows: &[PatternRow]) -> Vec<TagPattern> {
    rows.iter()
        .map(
            |&(pattern, confidence, primary, secondary, interests, description)| TagPattern {
                pattern: Regex::new(&format!("(?i){pattern}")).expect("static regex"),
                confidence,
                primary,
                secondary,
                interests,
                description,
            },
        )
        .collect()
}

/// Stage 1: narrow jargon groups.
pub static HIGH_PRIORITY_PATTERNS: LazyLock<Vec<TagPattern>> = LazyLock::new(|| {
    compile(&[
        (
            r"\b(edm|techno|trance|psy[- ]?trance|raves?|dj\s+sets?|bass\s+drops?|house\s+music|dubstep|drum\s*(?:and|&|n)\s*bass|dnb)\b",
            0.95,
            &["Music", "Nightlife"],
            &["Electronic/EDM", "DJ Nights", "Clubbing"],
            &["Techno", "House", "Trance"],
            "electronic music jargon",
        ),
        (
            r"\b(marathons?|half[- ]marathon|(?:5|10|21|42)\s?k\s+(?:runs?|races?|runners?|walks?|challenges?)|ultra\s*runs?|trail\s+run(?:s|ning)?|fun\s+runs?|run(?:ning)?\s+clubs?)\b",
            0.95,
            &["Sports & Fitness"],
            &["Running", "Marathons"],
            &[],
            "running race jargon",
        ),
        (
            r"\b(yoga|meditat(?:e|ion)|sound\s+(?:bath|healing)|breath\s*work|mindfulness|reiki|wellness\s+retreats?)\b",
            0.9,
            &["Health & Wellness"],
            &["Yoga", "Meditation", "Sound Healing", "Breathwork"],
            &["Mindfulness"],
            "wellness practice jargon",
        ),
        (
            r"\b(team\s+(?:outings?|building|bonding|events?|activities|offsites?)|offsites?|corporate\s+(?:outings?|events?|teams?)|office\s+(?:party|parties|outings?))\b",
            0.9,
            &["Corporate & Team Building"],
            &["Team Outings", "Team Building Activities", "Offsites"],
            &[],
            "team outing jargon",
        ),
        (
            r"\b(stand[- ]?up(?:\s+comedy)?|open\s+mic\s+comedy|comedy\s+(?:shows?|nights?|gigs?)|comedians?|roasts?|improv)\b",
            0.9,
            &["Comedy"],
            &["Stand-up Comedy", "Comedy Shows"],
            &[],
            "comedy jargon",
        ),
    ])
});

/// Stage 2: broader single and double word patterns.
pub static GENERAL_PATTERNS: LazyLock<Vec<TagPattern>> = LazyLock::new(|| {
    compile(&[
        (
            r"\b(jazz|blues)\b",
            0.9,
            &["Music"],
            &["Jazz/Blues", "Live Music"],
            &["Jazz", "Blues"],
            "jazz or blues",
        ),
        (
            r"\b(concerts?|gigs?|live\s+music|live\s+bands?|bands?)\b",
            0.85,
            &["Music"],
            &["Live Music", "Concerts"],
            &[],
            "live music",
        ),
        (
            r"\b(rock|metal|metalheads?)\b",
            0.85,
            &["Music"],
            &["Rock/Metal"],
            &["Heavy Metal"],
            "rock or metal",
        ),
        (
            r"\b(hip[- ]?hop|rap|rappers?)\b",
            0.85,
            &["Music"],
            &["Hip Hop/Rap"],
            &["Rap"],
            "hip hop",
        ),
        (
            r"\b(acoustic|unplugged|singer[- ]songwriters?|indie\s+music)\b",
            0.8,
            &["Music"],
            &["Indie", "Live Music"],
            &["Acoustic"],
            "acoustic or indie",
        ),
        (
            r"\b(classical\s+music|carnatic|hindustani|orchestras?|symphon(?:y|ies))\b",
            0.8,
            &["Music"],
            &["Classical"],
            &[],
            "classical music",
        ),
        (
            r"\b(bollywood)\b",
            0.8,
            &["Music"],
            &["Bollywood"],
            &[],
            "bollywood",
        ),
        (
            r"\b(karaoke)\b",
            0.8,
            &["Music", "Nightlife"],
            &["Bar Events"],
            &["Karaoke"],
            "karaoke",
        ),
        (
            r"\b(music\s+festivals?|sunburn|nh7)\b",
            0.85,
            &["Music", "Festivals"],
            &["Music Festivals"],
            &[],
            "music festival",
        ),
        (
            r"\b(music|musical\s+nights?)\b",
            0.7,
            &["Music"],
            &["Live Music"],
            &[],
            "music",
        ),
        (
            r"\b(clubbing|nightclubs?|club\s+nights?|pub\s+crawls?|bar\s+hopping|part(?:y|ies)|ladies\s+night)\b",
            0.8,
            &["Nightlife"],
            &["Clubbing", "Bar Events"],
            &[],
            "nightlife",
        ),
        (
            r"\b(comedy|funny|laughs?)\b",
            0.85,
            &["Comedy"],
            &["Comedy Shows"],
            &[],
            "comedy",
        ),
        (
            r"\b(theat(?:re|er)|plays?|drama|musicals)\b",
            0.85,
            &["Arts & Culture"],
            &["Theatre"],
            &[],
            "theatre",
        ),
        (
            r"\b(art\s+(?:exhibitions?|shows?|galler(?:y|ies))|exhibitions?|galler(?:y|ies)|museums?)\b",
            0.8,
            &["Arts & Culture"],
            &["Art Exhibitions"],
            &["Museums"],
            "art exhibition",
        ),
        (
            r"\b(poetry|spoken\s+word|poetry\s+slam)\b",
            0.8,
            &["Arts & Culture"],
            &["Poetry"],
            &["Spoken Word"],
            "poetry",
        ),
        (
            r"\b(films?|movies?|screenings?|cinema)\b",
            0.8,
            &["Arts & Culture"],
            &["Film Screenings"],
            &[],
            "film",
        ),
        (
            r"\b(photography|photo\s*walks?)\b",
            0.8,
            &["Arts & Culture"],
            &["Photography"],
            &[],
            "photography",
        ),
        (
            r"\b(heritage\s+walks?|walking\s+tours?|history\s+walks?)\b",
            0.8,
            &["Arts & Culture"],
            &["Heritage Walks"],
            &[],
            "heritage walk",
        ),
        (
            r"\b(dance|dancing)\b",
            0.75,
            &["Arts & Culture", "Workshops & Classes"],
            &["Dance Performances", "Dance Classes"],
            &[],
            "dance",
        ),
        (
            r"\b(salsa|bachata)\b",
            0.85,
            &["Workshops & Classes"],
            &["Dance Classes"],
            &["Salsa", "Bachata"],
            "partner dance",
        ),
        (
            r"\b(food|foodies?|cuisine|street\s+food|food\s+fest(?:ival)?s?)\b",
            0.8,
            &["Food & Drink"],
            &["Food Festivals", "Street Food"],
            &[],
            "food",
        ),
        (
            r"\b(brunch(?:es)?|pop[- ]?up\s+dinners?|supper\s+clubs?)\b",
            0.8,
            &["Food & Drink"],
            &["Brunches", "Pop-up Dinners"],
            &[],
            "brunch or dinner",
        ),
        (
            r"\b(wine|craft\s+beer|beers?|brewer(?:y|ies)|cocktails?)\b",
            0.8,
            &["Food & Drink", "Nightlife"],
            &["Wine Tasting", "Brewery Tours"],
            &["Craft Beer", "Wine", "Cocktails"],
            "drinks",
        ),
        (
            r"\b(workshops?|class(?:es)?|masterclass(?:es)?|diy|crafts?)\b",
            0.75,
            &["Workshops & Classes"],
            &["Art Workshops", "DIY & Crafts"],
            &[],
            "workshop",
        ),
        (
            r"\b(pottery|ceramics?|calligraphy)\b",
            0.85,
            &["Workshops & Classes"],
            &["Pottery"],
            &["Ceramics", "Calligraphy"],
            "pottery or calligraphy",
        ),
        (
            r"\b(tech|meetups?|hackathons?|startups?|developers?|coding|machine\s+learning|founders?)\b",
            0.85,
            &["Tech & Business"],
            &["Tech Meetups", "Startup Events"],
            &[],
            "tech",
        ),
        (
            r"\b(networking|conferences?|summits?)\b",
            0.8,
            &["Tech & Business"],
            &["Networking", "Conferences"],
            &[],
            "networking",
        ),
        (
            r"\b(treks?|trekking|hikes?|hiking|camping|nature\s+walks?)\b",
            0.85,
            &["Outdoors & Adventure"],
            &["Treks", "Camping", "Nature Walks"],
            &[],
            "trekking",
        ),
        (
            r"\b(kayaking|rock\s+climbing|rappelling|paragliding|rafting|adventure)\b",
            0.8,
            &["Outdoors & Adventure"],
            &["Adventure Sports", "Water Sports"],
            &[],
            "adventure sport",
        ),
        (
            r"\b(stargazing|birdwatching|bird\s+watching)\b",
            0.8,
            &["Outdoors & Adventure"],
            &["Nature Walks"],
            &["Stargazing", "Birdwatching"],
            "nature observation",
        ),
        (
            r"\b(kids?|children|family|toddlers?|child)\b",
            0.85,
            &["Family & Kids"],
            &["Kids Workshops", "Family Fun"],
            &[],
            "kids and family",
        ),
        (
            r"\b(football|cricket|badminton|cycling|swimming|pickleball|sports?)\b",
            0.8,
            &["Sports & Fitness"],
            &[],
            &[],
            "sport",
        ),
        (
            r"\b(fitness|workouts?|bootcamps?|crossfit|zumba|gym)\b",
            0.75,
            &["Sports & Fitness"],
            &["Fitness Bootcamps"],
            &[],
            "fitness",
        ),
        (
            r"\b(volunteer(?:ing)?|charity|ngos?|fundraisers?|social\s+causes?)\b",
            0.8,
            &["Community & Causes"],
            &["Volunteering", "Social Causes"],
            &[],
            "volunteering",
        ),
        (
            r"\b(book\s+clubs?|quiz(?:zes)?|trivia|board\s+games?)\b",
            0.8,
            &["Community & Causes"],
            &["Book Clubs", "Meetups"],
            &["Board Games", "Quiz Nights"],
            "clubs and games",
        ),
        (
            r"\b(flea\s+markets?|bazaars?)\b",
            0.8,
            &["Community & Causes"],
            &["Flea Markets"],
            &[],
            "market",
        ),
        (
            r"\b(festivals?|fests?|diwali|holi|christmas|navratri|new\s+year)\b",
            0.8,
            &["Festivals"],
            &["Cultural Festivals", "Festive Celebrations"],
            &[],
            "festival",
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Taxonomy, TaxonomyLevel};

    #[test]
    fn test_all_pattern_names_exist_in_builtin_taxonomy() {
        let taxonomy = Taxonomy::builtin();
        for p in HIGH_PRIORITY_PATTERNS.iter().chain(GENERAL_PATTERNS.iter()) {
            for name in p.primary {
                assert!(taxonomy.contains(TaxonomyLevel::Primary, name), "{name}");
            }
            for name in p.secondary {
                assert!(taxonomy.contains(TaxonomyLevel::Secondary, name), "{name}");
            }
            for name in p.interests {
                assert!(taxonomy.contains(TaxonomyLevel::Interest, name), "{name}");
            }
        }
    }

    #[test]
    fn test_confidence_bands() {
        assert!(
            HIGH_PRIORITY_PATTERNS
                .iter()
                .all(|p| (0.9..=0.95).contains(&p.confidence))
        );
        assert!(
            GENERAL_PATTERNS
                .iter()
                .all(|p| (0.7..=0.9).contains(&p.confidence))
        );
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let edm = &HIGH_PRIORITY_PATTERNS[0];
        assert!(edm.pattern.is_match("EDM party"));
        assert!(edm.pattern.is_match("Psy-Trance all night"));
        assert!(!edm.pattern.is_match("a warehouse sale"));
    }

    #[test]
    fn test_race_distance_needs_race_word() {
        let running = HIGH_PRIORITY_PATTERNS
            .iter()
            .find(|p| p.description == "running race jargon")
            .unwrap();
        assert!(running.pattern.is_match("signing up for a 10k run"));
        assert!(running.pattern.is_match("5K race on sunday"));
        assert!(!running.pattern.is_match("concerts under 5k"));
        assert!(!running.pattern.is_match("dinner for 2 under 10k"));
    }

    #[test]
    fn test_class_does_not_match_classical() {
        let workshop = GENERAL_PATTERNS
            .iter()
            .find(|p| p.description == "workshop")
            .unwrap();
        assert!(!workshop.pattern.is_match("classical evening"));
        assert!(workshop.pattern.is_match("pottery classes"));
    }
}
