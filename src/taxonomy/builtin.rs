//! Built-in event vocabulary.

use super::TaxonomyNode;

/// (primary, secondary categories, interests)
const BUILTIN: &[(&str, &[&str], &[&str])] = &[
    (
        "Music",
        &[
            "Live Music",
            "Concerts",
            "Jazz/Blues",
            "Rock/Metal",
            "Electronic/EDM",
            "Hip Hop/Rap",
            "Indie",
            "Classical",
            "Bollywood",
            "Open Mic",
        ],
        &[
            "Jazz",
            "Blues",
            "Techno",
            "House",
            "Trance",
            "Psytrance",
            "Acoustic",
            "Singer-Songwriter",
            "Karaoke",
            "Hindustani",
            "Carnatic",
            "Sufi",
            "Heavy Metal",
            "Rap",
            "Orchestra",
        ],
    ),
    (
        "Nightlife",
        &[
            "Clubbing",
            "DJ Nights",
            "Bar Events",
            "Pub Crawls",
            "Ladies Night",
            "Rooftop Parties",
        ],
        &[
            "Cocktails",
            "Dance Floor",
            "Themed Parties",
            "Happy Hours",
            "Bass Music",
        ],
    ),
    (
        "Arts & Culture",
        &[
            "Theatre",
            "Art Exhibitions",
            "Dance Performances",
            "Film Screenings",
            "Poetry",
            "Heritage Walks",
            "Photography",
        ],
        &[
            "Painting",
            "Sculpture",
            "Street Art",
            "Spoken Word",
            "Indie Films",
            "Museums",
            "Storytelling",
            "Classical Dance",
        ],
    ),
    (
        "Comedy",
        &["Stand-up Comedy", "Improv", "Open Mic Comedy", "Comedy Shows"],
        &["Sketch Comedy", "Roast", "Satire", "Hindi Comedy"],
    ),
    (
        "Food & Drink",
        &[
            "Food Festivals",
            "Brunches",
            "Wine Tasting",
            "Pop-up Dinners",
            "Street Food",
            "Brewery Tours",
        ],
        &[
            "Craft Beer",
            "Wine",
            "Coffee",
            "Baking",
            "Vegan",
            "Regional Cuisine",
            "Desserts",
        ],
    ),
    (
        "Sports & Fitness",
        &[
            "Running",
            "Marathons",
            "Cycling",
            "Football",
            "Cricket",
            "Badminton",
            "Fitness Bootcamps",
            "Swimming",
        ],
        &[
            "Half Marathon",
            "10K",
            "5K",
            "Trail Running",
            "Ultra Running",
            "CrossFit",
            "Zumba",
            "Pickleball",
        ],
    ),
    (
        "Health & Wellness",
        &[
            "Yoga",
            "Meditation",
            "Sound Healing",
            "Breathwork",
            "Wellness Retreats",
            "Mental Health",
        ],
        &[
            "Hatha Yoga",
            "Vinyasa",
            "Mindfulness",
            "Sound Bath",
            "Reiki",
            "Ayurveda",
            "Pilates",
        ],
    ),
    (
        "Workshops & Classes",
        &[
            "Art Workshops",
            "Cooking Classes",
            "Pottery",
            "Dance Classes",
            "Photography Workshops",
            "Language Classes",
            "DIY & Crafts",
        ],
        &[
            "Ceramics",
            "Calligraphy",
            "Salsa",
            "Bachata",
            "Candle Making",
            "Resin Art",
            "Terrarium",
        ],
    ),
    (
        "Tech & Business",
        &[
            "Tech Meetups",
            "Startup Events",
            "Hackathons",
            "Conferences",
            "Networking",
        ],
        &[
            "AI",
            "Web3",
            "Data Science",
            "Product Management",
            "Design",
            "Entrepreneurship",
            "Developer Tools",
        ],
    ),
    (
        "Corporate & Team Building",
        &[
            "Team Outings",
            "Offsites",
            "Team Building Activities",
            "Corporate Workshops",
        ],
        &[
            "Escape Rooms",
            "Paintball",
            "Go-Karting",
            "Bowling",
            "Treasure Hunts",
            "Laser Tag",
        ],
    ),
    (
        "Outdoors & Adventure",
        &[
            "Treks",
            "Camping",
            "Nature Walks",
            "Water Sports",
            "Cycling Tours",
            "Adventure Sports",
        ],
        &[
            "Kayaking",
            "Rock Climbing",
            "Birdwatching",
            "Stargazing",
            "Rappelling",
            "Night Treks",
        ],
    ),
    (
        "Family & Kids",
        &[
            "Kids Workshops",
            "Family Fun",
            "Puppet Shows",
            "Storytelling Sessions",
        ],
        &[
            "STEM",
            "Magic Shows",
            "Face Painting",
            "Toddler Activities",
        ],
    ),
    (
        "Community & Causes",
        &[
            "Volunteering",
            "Meetups",
            "Book Clubs",
            "Social Causes",
            "Flea Markets",
        ],
        &[
            "Sustainability",
            "Animal Welfare",
            "Board Games",
            "Quiz Nights",
            "Language Exchange",
        ],
    ),
    (
        "Festivals",
        &[
            "Music Festivals",
            "Cultural Festivals",
            "Festive Celebrations",
            "Holiday Events",
        ],
        &[
            "Diwali",
            "Holi",
            "Christmas",
            "New Year's Eve",
            "Navratri",
            "Ganesh Chaturthi",
        ],
    ),
];

pub(super) fn nodes() -> Vec<TaxonomyNode> {
    BUILTIN
        .iter()
        .map(|(primary, secondary, interests)| TaxonomyNode {
            primary: (*primary).to_string(),
            secondary: secondary.iter().map(|s| (*s).to_string()).collect(),
            interests: interests.iter().map(|s| (*s).to_string()).collect(),
        })
        .collect()
}
