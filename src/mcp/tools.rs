//! Tool registry for MCP tools.

use serde_json::json;

use crate::models::{ParamSpec, ParamType, ToolDefinition, ToolKind};

const SEARCH_DEPTHS: &[&str] = &["basic", "advanced"];
const EXTRACT_DEPTHS: &[&str] = &["basic", "advanced"];
const TOPICS: &[&str] = &["general", "news"];
const TIME_RANGES: &[&str] = &["day", "week", "month", "year", "d", "w", "m", "y"];
const FORMATS: &[&str] = &["markdown", "text"];
const CRAWL_CATEGORIES: &[&str] = &[
    "Careers",
    "Blog",
    "Documentation",
    "About",
    "Pricing",
    "Community",
    "Developers",
    "Contact",
    "Media",
];
const COUNTRIES: &[&str] = &[
    "afghanistan", "albania", "algeria", "andorra", "angola", "argentina", "armenia",
    "australia", "austria", "azerbaijan", "bahamas", "bahrain", "bangladesh", "barbados",
    "belarus", "belgium", "belize", "benin", "bhutan", "bolivia", "bosnia and herzegovina",
    "botswana", "brazil", "brunei", "bulgaria", "burkina faso", "burundi", "cambodia",
    "cameroon", "canada", "cape verde", "central african republic", "chad", "chile", "china",
    "colombia", "comoros", "congo", "costa rica", "croatia", "cuba", "cyprus",
    "czech republic", "denmark", "djibouti", "dominican republic", "ecuador", "egypt",
    "el salvador", "equatorial guinea", "eritrea", "estonia", "ethiopia", "fiji", "finland",
    "france", "gabon", "gambia", "georgia", "germany", "ghana", "greece", "guatemala",
    "guinea", "haiti", "honduras", "hungary", "iceland", "india", "indonesia", "iran", "iraq",
    "ireland", "israel", "italy", "jamaica", "japan", "jordan", "kazakhstan", "kenya",
    "kuwait", "kyrgyzstan", "latvia", "lebanon", "lesotho", "liberia", "libya",
    "liechtenstein", "lithuania", "luxembourg", "madagascar", "malawi", "malaysia",
    "maldives", "mali", "malta", "mauritania", "mauritius", "mexico", "moldova", "monaco",
    "mongolia", "montenegro", "morocco", "mozambique", "myanmar", "namibia", "nepal",
    "netherlands", "new zealand", "nicaragua", "niger", "nigeria", "north korea",
    "north macedonia", "norway", "oman", "pakistan", "panama", "papua new guinea",
    "paraguay", "peru", "philippines", "poland", "portugal", "qatar", "romania", "russia",
    "rwanda", "saudi arabia", "senegal", "serbia", "singapore", "slovakia", "slovenia",
    "somalia", "south africa", "south korea", "south sudan", "spain", "sri lanka", "sudan",
    "sweden", "switzerland", "syria", "taiwan", "tajikistan", "tanzania", "thailand", "togo",
    "trinidad and tobago", "tunisia", "turkey", "turkmenistan", "uganda", "ukraine",
    "united arab emirates", "united kingdom", "united states", "uruguay", "uzbekistan",
    "venezuela", "vietnam", "yemen", "zambia", "zimbabwe",
];

/// Registry for all MCP tools
///
/// Populated once at startup; lookups are read-only afterwards.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Create a registry holding the search, extract, map and crawl tools
    pub fn new() -> Self {
        let mut registry = Self { tools: Vec::new() };

        // 1. search - web search
        registry.register(ToolDefinition::new(
            ToolKind::Search,
            "A powerful web search tool that provides comprehensive, real-time results using \
             Tavily's AI search engine. Returns relevant web content with customizable parameters \
             for result count, content type, and domain filtering. Ideal for gathering current \
             information, news, and detailed web content analysis.",
            vec![
                ParamSpec::required(
                    "query",
                    ParamType::String,
                    "The search query to execute with Tavily.",
                ),
                ParamSpec::optional(
                    "search_depth",
                    ParamType::Choice(SEARCH_DEPTHS),
                    json!("basic"),
                    "The depth of the search. It can be 'basic' or 'advanced'",
                ),
                ParamSpec::optional(
                    "max_results",
                    ParamType::Integer {
                        min: Some(5),
                        max: Some(20),
                    },
                    json!(10),
                    "The maximum number of search results to return",
                ),
                ParamSpec::optional(
                    "include_domains",
                    ParamType::StringList { min_items: 0 },
                    json!([]),
                    "A list of domains to specifically include in the search results, if the user \
                     asks to search on specific sites set this to the domain of the site",
                ),
                ParamSpec::optional(
                    "exclude_domains",
                    ParamType::StringList { min_items: 0 },
                    json!([]),
                    "List of domains to specifically exclude, if the user asks to exclude a domain \
                     set this to the domain of the site",
                ),
                ParamSpec::optional(
                    "include_answer",
                    ParamType::Boolean,
                    json!(false),
                    "Include an LLM-generated answer to the provided query",
                ),
                ParamSpec::optional(
                    "include_raw_content",
                    ParamType::Boolean,
                    json!(false),
                    "Include the cleaned and parsed HTML content of each search result",
                ),
                ParamSpec::optional(
                    "topic",
                    ParamType::Choice(TOPICS),
                    json!("general"),
                    "The category of the search. This will determine which of our agents will be \
                     used for the search",
                ),
                ParamSpec::nullable(
                    "time_range",
                    ParamType::Choice(TIME_RANGES),
                    "The time range back from the current date to include in the search results",
                ),
                ParamSpec::optional(
                    "days",
                    ParamType::Integer {
                        min: Some(1),
                        max: None,
                    },
                    json!(3),
                    "The number of days back from the current date to include in the search \
                     results. Only available when using the 'news' search topic",
                ),
                ParamSpec::optional(
                    "auto_parameters",
                    ParamType::Boolean,
                    json!(false),
                    "Let Tavily automatically configure search parameters based on the query. \
                     Explicit parameters override the automatic ones.",
                ),
                ParamSpec::optional(
                    "include_images",
                    ParamType::Boolean,
                    json!(false),
                    "Include a list of query-related images in the response",
                ),
                ParamSpec::optional(
                    "include_image_descriptions",
                    ParamType::Boolean,
                    json!(false),
                    "Include a list of query-related images and their descriptions in the response",
                ),
                ParamSpec::nullable(
                    "country",
                    ParamType::Choice(COUNTRIES),
                    "Boost search results from a specific country. Available only if topic is \
                     general.",
                ),
            ],
        ));

        // 2. extract - content extraction from URLs
        registry.register(ToolDefinition::new(
            ToolKind::Extract,
            "A powerful web content extraction tool that retrieves and processes raw content from \
             specified URLs, ideal for data collection, content analysis, and research tasks.",
            vec![
                ParamSpec::required(
                    "urls",
                    ParamType::StringList { min_items: 1 },
                    "List of URLs to extract content from",
                ),
                ParamSpec::optional(
                    "extract_depth",
                    ParamType::Choice(EXTRACT_DEPTHS),
                    json!("basic"),
                    "Depth of extraction - 'basic' or 'advanced', if urls are linkedin use \
                     'advanced' or if explicitly told to use advanced",
                ),
                ParamSpec::optional(
                    "include_images",
                    ParamType::Boolean,
                    json!(false),
                    "Include a list of images extracted from the urls in the response",
                ),
                ParamSpec::optional(
                    "format",
                    ParamType::Choice(FORMATS),
                    json!("markdown"),
                    "The format of the extracted web page content. markdown returns content in \
                     markdown format. text returns plain text and may increase latency.",
                ),
            ],
        ));

        // 3. map - site structure discovery
        registry.register(ToolDefinition::new(
            ToolKind::Map,
            "A powerful web mapping tool that creates a structured map of website URLs, allowing \
             you to discover and analyze site structure, content organization, and navigation \
             paths. Perfect for site audits, content discovery, and understanding website \
             architecture.",
            site_traversal_params("Root URL to begin the mapping"),
        ));

        // 4. crawl - structured crawl with content extraction
        let mut crawl_params = site_traversal_params("Root URL to begin the crawl");
        crawl_params.push(ParamSpec::optional(
            "extract_depth",
            ParamType::Choice(EXTRACT_DEPTHS),
            json!("basic"),
            "Advanced extraction retrieves more data, including tables and embedded content, \
             with higher success but may increase latency",
        ));
        crawl_params.push(ParamSpec::optional(
            "format",
            ParamType::Choice(FORMATS),
            json!("markdown"),
            "The format of the extracted web page content. markdown returns content in markdown \
             format. text returns plain text and may increase latency.",
        ));
        registry.register(ToolDefinition::new(
            ToolKind::Crawl,
            "A powerful web crawler that initiates a structured web crawl starting from a \
             specified base URL. The crawler expands from that point like a tree, following \
             internal links across pages. You can control how deep and wide it goes, and guide it \
             to focus on specific sections of the site.",
            crawl_params,
        ));

        registry
    }

    /// Register a tool. A tool with the same name is replaced in place.
    pub fn register(&mut self, tool: ToolDefinition) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get all tools in registration order
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters shared by the map and crawl tools
fn site_traversal_params(url_description: &'static str) -> Vec<ParamSpec> {
    vec![
        ParamSpec::required("url", ParamType::String, url_description),
        ParamSpec::optional(
            "max_depth",
            ParamType::Integer {
                min: Some(1),
                max: None,
            },
            json!(1),
            "Max depth of the traversal. Defines how far from the base URL the crawler can explore",
        ),
        ParamSpec::optional(
            "max_breadth",
            ParamType::Integer {
                min: Some(1),
                max: None,
            },
            json!(20),
            "Max number of links to follow per level of the tree (i.e., per page)",
        ),
        ParamSpec::optional(
            "limit",
            ParamType::Integer {
                min: Some(1),
                max: None,
            },
            json!(50),
            "Total number of links the crawler will process before stopping",
        ),
        ParamSpec::nullable(
            "instructions",
            ParamType::String,
            "Natural language instructions for the crawler",
        ),
        ParamSpec::optional(
            "select_paths",
            ParamType::StringList { min_items: 0 },
            json!([]),
            "Regex patterns to select only URLs with specific path patterns (e.g., /docs/.*, \
             /api/v1.*)",
        ),
        ParamSpec::optional(
            "select_domains",
            ParamType::StringList { min_items: 0 },
            json!([]),
            "Regex patterns to select crawling to specific domains or subdomains (e.g., \
             ^docs\\.example\\.com$)",
        ),
        ParamSpec::optional(
            "exclude_paths",
            ParamType::StringList { min_items: 0 },
            json!([]),
            "Regex patterns to exclude URLs with specific path patterns (e.g., /private/.*)",
        ),
        ParamSpec::optional(
            "exclude_domains",
            ParamType::StringList { min_items: 0 },
            json!([]),
            "Regex patterns to exclude specific domains or subdomains from crawling",
        ),
        ParamSpec::optional(
            "allow_external",
            ParamType::Boolean,
            json!(false),
            "Whether to allow following links that go to external domains",
        ),
        ParamSpec::optional(
            "categories",
            ParamType::ChoiceList(CRAWL_CATEGORIES),
            json!([]),
            "Filter URLs using predefined categories like documentation, blog, api, etc",
        ),
    ]
}
