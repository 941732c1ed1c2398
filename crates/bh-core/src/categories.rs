//! Category rule configuration.
//!
//! The rule table is ordered: earlier categories win ties, and within a
//! category domain substrings are checked before URL patterns. The table is
//! loaded once and treated as immutable; a user-supplied TOML file with the
//! same shape can replace the built-in defaults.

use serde::{Deserialize, Serialize};

/// Name of the implicit bucket for entries no rule matched.
pub const OTHER_CATEGORY: &str = "other";

/// Categories counted as productive in session and corpus metrics.
pub const PRODUCTIVE_CATEGORIES: [&str; 3] = ["development", "learning", "productivity"];

/// Categories counted as unproductive in session and corpus metrics.
pub const UNPRODUCTIVE_CATEGORIES: [&str; 3] = ["social_media", "entertainment", "shopping"];

/// A named subcategory matched by host substrings, in configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryRule {
    pub name: String,
    pub hosts: Vec<String>,
}

/// One category: domain substrings, URL regex patterns, and subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub domains: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryRule>,
}

/// The ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub categories: Vec<CategoryRule>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

fn rule(
    name: &str,
    domains: &[&str],
    patterns: &[&str],
    subcategories: &[(&str, &[&str])],
) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        domains: domains.iter().map(ToString::to_string).collect(),
        patterns: patterns.iter().map(ToString::to_string).collect(),
        subcategories: subcategories
            .iter()
            .map(|(sub, hosts)| SubcategoryRule {
                name: (*sub).to_string(),
                hosts: hosts.iter().map(ToString::to_string).collect(),
            })
            .collect(),
    }
}

impl CategoryConfig {
    /// The built-in rule table.
    #[must_use]
    pub fn builtin() -> Self {
        let categories = vec![
            rule(
                "social_media",
                &[
                    "facebook.com",
                    "twitter.com",
                    "x.com",
                    "instagram.com",
                    "reddit.com",
                    "linkedin.com",
                    "tiktok.com",
                    "snapchat.com",
                    "pinterest.com",
                    "tumblr.com",
                    "discord.com",
                    "slack.com",
                    "whatsapp.com",
                    "telegram.org",
                    "mastodon.social",
                    "threads.net",
                    "bsky.social",
                    "bereal.com",
                ],
                &["social", "/comments/", "/status/", "/post/"],
                &[
                    ("professional", &["linkedin.com", "slack.com"]),
                    ("messaging", &["whatsapp.com", "telegram.org", "discord.com"]),
                    (
                        "content_sharing",
                        &["instagram.com", "tiktok.com", "pinterest.com"],
                    ),
                ],
            ),
            rule(
                "entertainment",
                &[
                    "youtube.com",
                    "netflix.com",
                    "spotify.com",
                    "twitch.tv",
                    "hulu.com",
                    "disneyplus.com",
                    "hbomax.com",
                    "primevideo.com",
                    "vimeo.com",
                    "soundcloud.com",
                    "pandora.com",
                    "applemusic.com",
                    "deezer.com",
                    "crunchyroll.com",
                    "funimation.com",
                    "steam.com",
                    "epicgames.com",
                    "ign.com",
                    "gamespot.com",
                    "kotaku.com",
                    "polygon.com",
                ],
                &[
                    "/watch",
                    "/video/",
                    "/episode/",
                    "/game/",
                    r"wiki\.fandom\.com",
                ],
                &[
                    ("video", &["youtube.com", "netflix.com", "twitch.tv"]),
                    ("music", &["spotify.com", "soundcloud.com", "pandora.com"]),
                    (
                        "gaming",
                        &["steam.com", "epicgames.com", "ign.com", ".fandom.com"],
                    ),
                ],
            ),
            rule(
                "development",
                &[
                    "stackoverflow.com",
                    "github.com",
                    "gitlab.com",
                    "bitbucket.org",
                    "developer.mozilla.org",
                    "w3schools.com",
                    "css-tricks.com",
                    "dev.to",
                    "hashnode.dev",
                    "codesandbox.io",
                    "codepen.io",
                    "jsfiddle.net",
                    "replit.com",
                    "vercel.com",
                    "netlify.com",
                    "npmjs.com",
                    "pypi.org",
                    "crates.io",
                    "packagist.org",
                    "docker.com",
                    "kubernetes.io",
                    "terraform.io",
                ],
                &[
                    r"docs\..*\.(?:com|org|io)",
                    r".*\.readthedocs\.io",
                    "/documentation/",
                    "/api/",
                    "/reference/",
                    r"github\.com/.*/(?:issues|pull|wiki)",
                    r"stackoverflow\.com/questions/",
                ],
                &[
                    ("q&a", &["stackoverflow.com", "dev.to"]),
                    (
                        "repositories",
                        &["github.com", "gitlab.com", "bitbucket.org"],
                    ),
                    (
                        "documentation",
                        &["docs.", ".readthedocs.io", "developer.mozilla.org"],
                    ),
                    ("tools", &["codesandbox.io", "codepen.io", "replit.com"]),
                ],
            ),
            rule(
                "learning",
                &[
                    "coursera.org",
                    "udemy.com",
                    "edx.org",
                    "khanacademy.org",
                    "udacity.com",
                    "pluralsight.com",
                    "lynda.com",
                    "skillshare.com",
                    "masterclass.com",
                    "brilliant.org",
                    "datacamp.com",
                    "codecademy.com",
                    "freecodecamp.org",
                    "mit.edu",
                    "stanford.edu",
                    "harvard.edu",
                    "arxiv.org",
                    "scholar.google.com",
                    "jstor.org",
                    "pubmed.ncbi.nlm.nih.gov",
                    "wikipedia.org",
                    "wikihow.com",
                    "instructables.com",
                ],
                &[
                    "/course/",
                    "/tutorial/",
                    "/learn/",
                    "/guide/",
                    "/how-to",
                    r"\.edu/",
                    "/research/",
                    "/paper/",
                    "/study/",
                ],
                &[
                    ("moocs", &["coursera.org", "udemy.com", "edx.org"]),
                    (
                        "technical",
                        &["freecodecamp.org", "codecademy.com", "datacamp.com"],
                    ),
                    (
                        "academic",
                        &["arxiv.org", "scholar.google.com", "jstor.org", ".edu"],
                    ),
                    ("practical", &["wikihow.com", "instructables.com"]),
                ],
            ),
            rule(
                "productivity",
                &[
                    "notion.so",
                    "trello.com",
                    "asana.com",
                    "todoist.com",
                    "monday.com",
                    "clickup.com",
                    "airtable.com",
                    "basecamp.com",
                    "jira.atlassian.com",
                    "confluence.atlassian.com",
                    "evernote.com",
                    "onenote.com",
                    "obsidian.md",
                    "roamresearch.com",
                    "workflowy.com",
                    "calendar.google.com",
                    "outlook.com",
                    "zoom.us",
                    "meet.google.com",
                    "teams.microsoft.com",
                    "calendly.com",
                ],
                &["/calendar/", "/tasks/", "/projects/", "/workspace/"],
                &[
                    (
                        "project_management",
                        &["trello.com", "asana.com", "jira.atlassian.com"],
                    ),
                    ("notes", &["notion.so", "evernote.com", "obsidian.md"]),
                    (
                        "communication",
                        &["zoom.us", "meet.google.com", "teams.microsoft.com"],
                    ),
                ],
            ),
            rule(
                "news",
                &[
                    "nytimes.com",
                    "washingtonpost.com",
                    "wsj.com",
                    "ft.com",
                    "economist.com",
                    "bbc.com",
                    "cnn.com",
                    "reuters.com",
                    "apnews.com",
                    "npr.org",
                    "theguardian.com",
                    "foxnews.com",
                    "nbcnews.com",
                    "abcnews.go.com",
                    "usatoday.com",
                    "politico.com",
                    "axios.com",
                    "bloomberg.com",
                    "techcrunch.com",
                    "theverge.com",
                    "arstechnica.com",
                    "wired.com",
                    "hackernews.com",
                    "news.ycombinator.com",
                    "lobste.rs",
                    "slashdot.org",
                ],
                &["/article/", "/story/", "/news/", r"/\d{4}/\d{2}/\d{2}/"],
                &[
                    ("mainstream", &["nytimes.com", "bbc.com", "cnn.com"]),
                    (
                        "tech",
                        &["techcrunch.com", "theverge.com", "arstechnica.com"],
                    ),
                    ("aggregators", &["news.ycombinator.com"]),
                ],
            ),
            rule(
                "shopping",
                &[
                    "amazon.com",
                    "ebay.com",
                    "etsy.com",
                    "alibaba.com",
                    "walmart.com",
                    "target.com",
                    "bestbuy.com",
                    "homedepot.com",
                    "lowes.com",
                    "ikea.com",
                    "wayfair.com",
                    "shopify.com",
                    "wish.com",
                    "costco.com",
                    "sephora.com",
                    "ulta.com",
                    "nike.com",
                    "adidas.com",
                    "apple.com",
                    "samsung.com",
                ],
                &["/product/", "/cart/", "/checkout/", "/shop/", "/store/"],
                &[
                    ("marketplace", &["amazon.com", "ebay.com", "etsy.com"]),
                    ("retail", &["walmart.com", "target.com", "costco.com"]),
                    ("specialty", &["sephora.com", "nike.com", "apple.com"]),
                ],
            ),
            rule(
                "finance",
                &[
                    "chase.com",
                    "bankofamerica.com",
                    "wellsfargo.com",
                    "citi.com",
                    "paypal.com",
                    "venmo.com",
                    "cashapp.com",
                    "zelle.com",
                    "wise.com",
                    "coinbase.com",
                    "binance.com",
                    "kraken.com",
                    "robinhood.com",
                    "etrade.com",
                    "fidelity.com",
                    "vanguard.com",
                    "schwab.com",
                    "mint.com",
                    "ynab.com",
                    "personalcapital.com",
                    "creditkarma.com",
                ],
                &["/banking/", "/wallet/", "/account/", "/trading/"],
                &[
                    (
                        "banking",
                        &["chase.com", "bankofamerica.com", "wellsfargo.com"],
                    ),
                    ("payments", &["paypal.com", "venmo.com", "cashapp.com"]),
                    (
                        "investing",
                        &["robinhood.com", "fidelity.com", "vanguard.com"],
                    ),
                    ("crypto", &["coinbase.com", "binance.com", "kraken.com"]),
                ],
            ),
            rule(
                "health",
                &[
                    "webmd.com",
                    "mayoclinic.org",
                    "healthline.com",
                    "medlineplus.gov",
                    "nih.gov",
                    "cdc.gov",
                    "who.int",
                    "drugs.com",
                    "rxlist.com",
                    "myfitnesspal.com",
                    "fitbit.com",
                    "strava.com",
                    "headspace.com",
                    "calm.com",
                    "betterhelp.com",
                    "talkspace.com",
                    "zocdoc.com",
                ],
                &["/health/", "/medical/", "/symptoms/", "/conditions/"],
                &[
                    (
                        "medical_info",
                        &["webmd.com", "mayoclinic.org", "healthline.com"],
                    ),
                    ("fitness", &["myfitnesspal.com", "fitbit.com", "strava.com"]),
                    (
                        "mental_health",
                        &["headspace.com", "calm.com", "betterhelp.com"],
                    ),
                ],
            ),
            rule(
                "reference",
                &[
                    "google.com",
                    "bing.com",
                    "duckduckgo.com",
                    "yandex.com",
                    "baidu.com",
                    "dictionary.com",
                    "thesaurus.com",
                    "merriam-webster.com",
                    "oxforddictionaries.com",
                    "translate.google.com",
                    "deepl.com",
                    "wolframalpha.com",
                    "archive.org",
                    "maps.google.com",
                    "openstreetmap.org",
                    "waze.com",
                    "weather.com",
                    "timeanddate.com",
                    "xe.com",
                    "calculator.net",
                ],
                &["/search", "/define/", "/translate/", "/maps/", "/directions/"],
                &[
                    ("search", &["google.com", "bing.com", "duckduckgo.com"]),
                    (
                        "language",
                        &["dictionary.com", "translate.google.com", "deepl.com"],
                    ),
                    ("utilities", &["maps.google.com", "weather.com", "xe.com"]),
                ],
            ),
            rule(
                "professional",
                &[
                    "salesforce.com",
                    "hubspot.com",
                    "zendesk.com",
                    "intercom.com",
                    "mailchimp.com",
                    "constantcontact.com",
                    "hootsuite.com",
                    "buffer.com",
                    "canva.com",
                    "figma.com",
                    "adobe.com",
                    "sketch.com",
                    "miro.com",
                    "tableau.com",
                    "powerbi.microsoft.com",
                    "datastudio.google.com",
                ],
                &["/dashboard/", "/analytics/", "/reports/", "/design/"],
                &[
                    ("crm", &["salesforce.com", "hubspot.com", "zendesk.com"]),
                    (
                        "marketing",
                        &["mailchimp.com", "hootsuite.com", "buffer.com"],
                    ),
                    ("design", &["canva.com", "figma.com", "adobe.com"]),
                    ("analytics", &["tableau.com", "powerbi.microsoft.com"]),
                ],
            ),
        ];
        Self { categories }
    }
}
