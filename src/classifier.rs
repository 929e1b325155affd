use crate::models::Category;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// One classification rule. Rules are evaluated in declaration order and the
/// first match wins, so specific rules must be declared before general ones
/// (e.g. Food/Takeaway before Transport/Taxi).
struct Rule {
    name: &'static str,
    sub: &'static str,
    /// Any of these substrings in the description matches.
    keywords: &'static [&'static str],
    /// All of these substrings present in the description also matches.
    all: &'static [&'static str],
    /// Any of these substrings in the sector hint also matches.
    sectors: &'static [&'static str],
    /// The rule never matches while any of these is present.
    exclude: &'static [&'static str],
    /// Second keyword pass picking the subcategory; falls back to `sub`.
    refine: &'static [(&'static str, &'static [&'static str])],
}

const NONE: &[&str] = &[];
const NO_REFINE: &[(&str, &[&str])] = &[];

impl Rule {
    const fn simple(name: &'static str, sub: &'static str, keywords: &'static [&'static str]) -> Self {
        Self {
            name,
            sub,
            keywords,
            all: NONE,
            sectors: NONE,
            exclude: NONE,
            refine: NO_REFINE,
        }
    }

    fn matches(&self, desc: &str, sector: &str) -> bool {
        if self.exclude.iter().any(|k| desc.contains(k)) {
            return false;
        }
        if self.keywords.iter().any(|k| desc.contains(k)) {
            return true;
        }
        if !self.all.is_empty() && self.all.iter().all(|k| desc.contains(k)) {
            return true;
        }
        self.sectors.iter().any(|k| sector.contains(k))
    }

    fn category(&self, desc: &str) -> Category {
        for (sub, kws) in self.refine {
            if kws.iter().any(|k| desc.contains(k)) {
                return Category::new(self.name, *sub);
            }
        }
        Category::new(self.name, self.sub)
    }
}

const RULES: &[Rule] = &[
    // Employer salary payments, including the bare street-address form.
    Rule {
        name: "Income",
        sub: "Salary",
        keywords: &["hopitaux universitaires", "hôpitaux universitaires"],
        all: &["geneve", "perret-gentil"],
        sectors: NONE,
        exclude: NONE,
        refine: NO_REFINE,
    },
    Rule::simple(
        "Investments",
        "Trading",
        &["trading 212", "ibkr", "interactive brokers"],
    ),
    Rule::simple("ATM withdrawals", "", &["retrait au bancomat"]),
    Rule::simple(
        "Retirement",
        "Pillar 3A",
        &["frankly", "truewealth", "pillar 3a", "pilier 3a"],
    ),
    Rule::simple("Investments", "Pension fund", &["david nicolas de ridder"]),
    Rule::simple("Taxes", "", &["etat de genève", "etat de geneve"]),
    Rule {
        name: "Housing",
        sub: "Rent",
        keywords: &["bordier schmidhauser"],
        all: &["loyer", "geneve"],
        sectors: NONE,
        exclude: NONE,
        refine: NO_REFINE,
    },
    Rule::simple(
        "Travel",
        "Flights",
        &[
            "qatar", "swiss air", "easyjet", "lufthansa", "air france", "skywestair",
            "british airways", "klm", "emirates",
        ],
    ),
    // Generic incoming transfers, refined by what the money looks like.
    Rule {
        name: "Income",
        sub: "Transfer",
        keywords: &["virement", "transfer", "versement", "credit", "crédit"],
        all: NONE,
        sectors: NONE,
        exclude: NONE,
        refine: &[
            (
                "Salary",
                &[
                    "hopitaux universitaires", "hôpitaux", "universite de geneve",
                    "universitaires", "perret-gentil", "salaire", "salary", "paie", "payroll",
                ],
            ),
            (
                "Investments",
                &["dividend", "dividende", "investment", "investissement"],
            ),
        ],
    },
    Rule::simple(
        "Banking",
        "Fees & Interest",
        &["frais", "fee", "commission", "intérêt", "interest"],
    ),
    Rule::simple(
        "Insurance",
        "Health",
        &[
            "assura", "groupe mutuel", "mutuel assurance", "css", "helsana", "sanitas",
            "swica", "concordia", "supra-1846", "visana",
        ],
    ),
    Rule {
        name: "Insurance",
        sub: "Other",
        keywords: &[
            "insurance", "assurance", "axa", "zurich", "baloise", "allianz", "generali",
            "helvetia",
        ],
        all: NONE,
        sectors: NONE,
        exclude: NONE,
        refine: &[
            ("Car", &["car", "auto", "voiture", "vehicule"]),
            ("Health", &["health", "santé", "maladie", "medical"]),
            ("Home", &["home", "maison", "habitation", "household", "apartment"]),
        ],
    },
    Rule {
        name: "Subscriptions",
        sub: "Other",
        keywords: &[
            "spotify", "netflix", "apple.com/bill", "amazon prime", "disney+", "hbo",
            "youtube", "twitch", "crunchyroll", "deezer", "pandora", "tidal",
            "abonnement", "subscription",
        ],
        all: NONE,
        sectors: &["médias numériques"],
        exclude: NONE,
        refine: &[
            ("Music", &["spotify", "apple music", "deezer", "tidal", "pandora"]),
            (
                "Video",
                &["netflix", "disney+", "hbo", "amazon prime", "youtube premium", "crunchyroll"],
            ),
            ("Apple Services", &["apple.com"]),
            ("Software", &["microsoft", "office", "adobe", "dropbox", "google"]),
            ("AI", &["claude", "chatgpt"]),
        ],
    },
    // Checked before the generic Uber rule below so ride-hailing never
    // swallows food delivery.
    Rule {
        name: "Food",
        sub: "Takeaway",
        keywords: &[
            "uber *eats", "uber eats", "deliveroo", "just eat", "takeaway", "delivery",
            "livraison repas", "smood", "eat.ch",
        ],
        all: &["uber", "eats"],
        sectors: NONE,
        exclude: NONE,
        refine: NO_REFINE,
    },
    Rule {
        name: "Home",
        sub: "Groceries",
        keywords: &[
            "migros", "coop", "denner", "aldi", "lidl", "manor", "globus", "spar", "volg",
            "carrefour", "casino", "monoprix", "grocery", "supermarket", "supermarché",
        ],
        all: NONE,
        sectors: &["alimentation", "magasin d alimentation"],
        exclude: NONE,
        refine: NO_REFINE,
    },
    Rule::simple(
        "Home",
        "Furniture",
        &[
            "ikea", "conforama", "home depot", "jumbo", "hornbach", "bauhaus", "möbel",
            "furniture", "meuble",
        ],
    ),
    Rule::simple(
        "Home",
        "Phone & TV",
        &[
            "swisscom", "salt", "sunrise", "internet", "téléphone", "phone bill",
            "telecommunications",
        ],
    ),
    Rule::simple(
        "Home",
        "Utilities",
        &[
            "eau", "water", "électricité", "electricity", "gaz", "gas", "service industriel",
            "utility", "chauffage", "heating",
        ],
    ),
    Rule {
        name: "Food",
        sub: "Restaurant",
        keywords: &[
            "restaurant", "café", "cafe", "bar", "bistro", "brasserie", "mcdonalds",
            "burger king", "starbucks", "coffeeshop",
        ],
        all: NONE,
        sectors: &["restaurant", "restauration"],
        exclude: NONE,
        refine: NO_REFINE,
    },
    Rule::simple(
        "Transport",
        "Public Transport",
        &["cff", "sbb", "sncf", "tpg", "metro", "tram", "bus", "train", "transport public"],
    ),
    Rule::simple(
        "Transport",
        "Taxi",
        &["uber *trip", "uber trip", "uber *one", "taxi", "cabify", "lyft"],
    ),
    // Bare "uber" is ride-hailing only when no food-delivery token is
    // around; the guard must not touch the explicit taxi keywords above
    // (SEATTLE, THEATRE and friends contain "eat").
    Rule {
        name: "Transport",
        sub: "Taxi",
        keywords: &["uber"],
        all: NONE,
        sectors: NONE,
        exclude: &["eats", "eat"],
        refine: NO_REFINE,
    },
    Rule::simple(
        "Transport",
        "Fuel",
        &[
            "gas station", "essence", "petrol", "carburant", "shell", "bp ", "caltex",
            "migrol", "tamoil", "avia", "station service",
        ],
    ),
    Rule::simple(
        "Transport",
        "Parking",
        &["parking", "parkmeter", "parkhaus", "stationnement"],
    ),
    Rule::simple(
        "Transport",
        "Car Maintenance",
        &["mecanique", "garage", "auto repair", "car service", "entretien voiture"],
    ),
    Rule {
        name: "Shopping",
        sub: "Clothes",
        keywords: &[
            "h&m", "zara", "mango", "c&a", "primark", "esprit", "pull and bear", "bershka",
            "massimo dutti", "uniqlo",
        ],
        all: NONE,
        sectors: &["vêtements", "clothing"],
        exclude: NONE,
        refine: NO_REFINE,
    },
    Rule::simple(
        "Shopping",
        "Online",
        &["amazon", "aliexpress", "ebay", "zalando", "galaxus", "digitec", "online shopping"],
    ),
    Rule::simple(
        "Shopping",
        "Electronics",
        &[
            "fnac", "mediamarkt", "interdiscount", "fust", "microspot", "brack",
            "electronic", "electronique",
        ],
    ),
    Rule::simple(
        "Health & Wellness",
        "Sport",
        &[
            "gym", "fitness", "sport", "crossfit", "yoga", "pilates", "tennis", "golf",
            "swimming", "natation",
        ],
    ),
    Rule::simple(
        "Health & Wellness",
        "Medical",
        &[
            "medecin", "doctor", "hopital", "hospital", "clinic", "clinique", "dentist",
            "dentiste", "medical", "médical",
        ],
    ),
    Rule::simple(
        "Health & Wellness",
        "Pharmacy",
        &[
            "pharmacy", "pharmacie", "amavita", "sunkstore", "coop vitality", "medication",
            "médicament",
        ],
    ),
    Rule::simple(
        "Housing",
        "Rent",
        &["loyer", "location", "regies", "property management", "appartement payment"],
    ),
    Rule::simple(
        "Housing",
        "Mortgage",
        &["mortgage", "hypothèque", "hypotheque", "home loan"],
    ),
    Rule::simple(
        "Entertainment",
        "Cinema",
        &["cinema", "movie", "film", "pathé", "arena cinemas"],
    ),
    Rule::simple(
        "Entertainment",
        "Events",
        &[
            "concert", "festival", "ticket master", "show", "theatre", "théâtre", "opéra",
            "spectacle",
        ],
    ),
    Rule::simple(
        "Travel",
        "Accommodation",
        &["hotel", "airbnb", "booking.com", "lodging", "accommodation", "hébergement"],
    ),
    Rule::simple(
        "Travel",
        "Flights",
        &[
            "airline", "flight", "swiss", "easyjet", "lufthansa", "air france",
            "british airways", "aérien",
        ],
    ),
];

/// Smaller secondary table consulted when no description rule fires and a
/// sector hint is present.
const SECTOR_RULES: &[(&[&str], &str, &str)] = &[
    (&["restaurant", "fast-food"], "Food", "Restaurant"),
    (&["alimentation", "supermarché"], "Home", "Groceries"),
    (&["vêtements", "clothing"], "Shopping", "Clothes"),
    (&["médias", "musique", "livres"], "Entertainment", "Media"),
    (&["voyage", "hôtel"], "Travel", "Accommodation"),
];

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Map descriptive text plus an optional sector hint to a category. Pure and
/// total: the same input always yields the same category, and something is
/// always returned.
pub fn classify(description: &str, sector: &str) -> Category {
    let desc = description.to_lowercase();
    let sector = sector.trim().to_lowercase();

    for rule in RULES {
        if rule.matches(&desc, &sector) {
            return rule.category(&desc);
        }
    }

    if !sector.is_empty() {
        for (keywords, name, sub) in SECTOR_RULES {
            if keywords.iter().any(|k| sector.contains(k)) {
                return Category::new(*name, *sub);
            }
        }
        return Category::new("Miscellaneous", capitalize(&sector));
    }

    if desc.contains("transfer") || desc.contains("virement") {
        return Category::new("Banking", "Transfer");
    }

    Category::fallback()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
