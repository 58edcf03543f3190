//! One function per detectable deficiency, evaluated in [`RULES`] order.

use crate::config::AnalysisConfig;
use crate::extractor::SignalSet;
use crate::recommender::model::{Priority, Recommendation, RuleId, ScoreImpact};
use crate::scorer::{self, Category, Score};

pub(crate) struct RuleContext<'a> {
    pub signals: &'a SignalSet,
    pub score: &'a Score,
    pub config: &'a AnalysisConfig,
}

impl RuleContext<'_> {
    fn impact(&self, category: Category, points: u32) -> Option<ScoreImpact> {
        Some(ScoreImpact {
            category,
            points,
            projected_total: (self.score.total + points).min(100),
        })
    }
}

pub(crate) type Rule = fn(&RuleContext<'_>) -> Option<Recommendation>;

/// Evaluation order is emission order. Schema markup stays last.
pub(crate) const RULES: [Rule; 8] = [
    meta_description,
    title,
    h1_heading,
    content_length,
    h2_subheadings,
    https,
    links,
    schema_markup,
];

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn meta_description(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if scorer::has_meta_description(ctx.signals) {
        return None;
    }
    let w = &ctx.config.weights;
    Some(Recommendation {
        rule: RuleId::MissingMetaDescription,
        priority: Priority::High,
        title: "Add Meta Description".to_string(),
        estimated_time_range: "10-15 min".to_string(),
        description: "Your website is missing a meta description, which is crucial for search \
            engine results. A well-crafted meta description acts as a \"sales pitch\" in search \
            results, directly impacting your click-through rate (CTR). Search engines like Google \
            display this 150-160 character snippet below your page title, making it one of the \
            first things potential visitors see."
            .to_string(),
        impact_statements: lines(&[
            "Increases click-through rates by 5-15%",
            "Improves search result appearance",
            "Helps search engines understand page content",
            "Influences social media shares",
        ]),
        remediation_steps: lines(&[
            "Open your HTML file or CMS settings",
            "Locate the <head> section",
            "Add the meta description tag",
            "Write compelling 150-160 character description",
            "Include primary keywords naturally",
        ]),
        example_markup: Some(
            "<meta name=\"description\"\n      content=\"Discover expert SEO tips and\n      \
             strategies to boost your website ranking.\n      Improve visibility, traffic, and \
             conversions\n      with proven techniques.\">"
                .to_string(),
        ),
        best_practices: lines(&[
            "Keep it between 150-160 characters (optimal length)",
            "Include your primary keyword near the beginning",
            "Write for humans, not just search engines",
            "Make it unique for each page",
            "Include a call-to-action when appropriate",
            "Avoid duplicate descriptions across pages",
        ]),
        score_impact: ctx.impact(
            Category::OnPage,
            w.meta_description + w.meta_description_length,
        ),
    })
}

fn title(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let w = &ctx.config.weights;
    let t = &ctx.config.thresholds;

    if !scorer::has_title(ctx.signals) {
        return Some(Recommendation {
            rule: RuleId::MissingTitle,
            priority: Priority::High,
            title: "Add Title Tag".to_string(),
            estimated_time_range: "5-10 min".to_string(),
            description: "Your page is missing a title tag, which is one of the most important \
                on-page SEO elements. The title tag appears in search engine results, browser \
                tabs, and social media shares. Without it, search engines cannot properly index \
                your page, and users won't understand what your page is about before clicking."
                .to_string(),
            impact_statements: lines(&[
                "Critical for search engine ranking",
                "First impression in search results",
                "Improves click-through rate by 20-30%",
                "Required for social media sharing",
            ]),
            remediation_steps: lines(&[
                "Open your HTML file",
                "Find the <head> section",
                "Add a <title> tag",
                "Write a descriptive 50-60 character title",
                "Include your primary keyword",
            ]),
            example_markup: Some(
                "<title>SEO Tips &amp; Strategies | Boost Your Rankings - YourBrand</title>"
                    .to_string(),
            ),
            best_practices: lines(&[
                "Keep between 50-60 characters for optimal display",
                "Put important keywords first",
                "Include your brand name at the end",
                "Make each page title unique",
                "Avoid keyword stuffing",
                "Write compelling, clickable titles",
            ]),
            score_impact: ctx.impact(Category::OnPage, w.title + w.title_length),
        });
    }

    let length = ctx.signals.title_length;
    if length >= t.title_length_min {
        return None;
    }
    Some(Recommendation {
        rule: RuleId::ShortTitle,
        priority: Priority::Medium,
        title: "Expand Title Tag Length".to_string(),
        estimated_time_range: "5 min".to_string(),
        description: format!(
            "Your title tag is only {length} characters, which is too short to be effective. \
             Search engines display up to {max} characters in search results, and you're not \
             utilizing this valuable space. A longer, more descriptive title can significantly \
             improve your click-through rate and provide better context to both users and \
             search engines.",
            max = t.title_length_max,
        ),
        impact_statements: lines(&[
            "Better use of SERP real estate",
            "Improved keyword targeting",
            "Higher click-through rates",
            "More descriptive for users",
        ]),
        remediation_steps: vec![
            format!("Review your current title: \"{}\"", ctx.signals.title),
            "Add descriptive keywords".to_string(),
            "Expand to 50-60 characters".to_string(),
            "Test the appearance in Google SERP simulator".to_string(),
        ],
        example_markup: None,
        best_practices: lines(&[
            "Aim for 50-60 characters total",
            "Include primary and secondary keywords",
            "Make it compelling and clickable",
            "Add your brand name if space allows",
        ]),
        score_impact: ctx.impact(Category::OnPage, w.title_length),
    })
}

fn h1_heading(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let w = &ctx.config.weights;
    let count = ctx.signals.h1_count;

    if count == 0 {
        return Some(Recommendation {
            rule: RuleId::MissingH1,
            priority: Priority::High,
            title: "Add H1 Heading Tag".to_string(),
            estimated_time_range: "5 min".to_string(),
            description: "Your page is missing an H1 tag, which is essential for proper page \
                structure and SEO. The H1 tag tells both users and search engines what the main \
                topic of your page is. Without it, search engines have difficulty understanding \
                your content hierarchy, which can negatively impact your rankings."
                .to_string(),
            impact_statements: lines(&[
                "Improves content structure",
                "Helps search engines understand page topic",
                "Better accessibility for screen readers",
                "Increases relevance for target keywords",
            ]),
            remediation_steps: lines(&[
                "Identify the main heading on your page",
                "Wrap it in an <h1> tag",
                "Ensure it includes your primary keyword",
                "Use only ONE H1 per page",
            ]),
            example_markup: Some(
                "<h1>Complete Guide to SEO Optimization in 2025</h1>".to_string(),
            ),
            best_practices: lines(&[
                "Use only one H1 tag per page",
                "Include your primary keyword",
                "Make it descriptive and compelling",
                "Keep it between 20-70 characters",
                "Place it prominently near the top of the page",
            ]),
            score_impact: ctx.impact(Category::OnPage, w.h1_present + w.single_h1),
        });
    }

    if count == 1 {
        return None;
    }
    Some(Recommendation {
        rule: RuleId::MultipleH1,
        priority: Priority::Medium,
        title: "Use Only One H1 Tag".to_string(),
        estimated_time_range: "10 min".to_string(),
        description: format!(
            "Your page has {count} H1 tags, but SEO best practices recommend using only one H1 \
             per page. Multiple H1 tags confuse search engines about which heading is the main \
             topic of your page. This dilutes the SEO value and can harm your rankings. Convert \
             additional H1 tags to H2 or H3 tags to maintain proper content hierarchy."
        ),
        impact_statements: lines(&[
            "Clearer content hierarchy",
            "Better search engine understanding",
            "Improved page structure",
            "Stronger focus on main keyword",
        ]),
        remediation_steps: lines(&[
            "Identify all H1 tags on your page",
            "Choose the most important one as your main H1",
            "Convert others to H2 or H3 tags",
            "Verify the hierarchy makes sense",
        ]),
        example_markup: None,
        best_practices: lines(&[
            "Always use exactly one H1 per page",
            "Use H2 for major sections",
            "Use H3 for subsections",
            "Maintain logical hierarchy (H1 → H2 → H3)",
            "Don't skip heading levels",
        ]),
        score_impact: ctx.impact(Category::Technical, w.single_h1),
    })
}

fn content_length(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let words = ctx.signals.word_count;
    if words >= ctx.config.thresholds.word_count_min {
        return None;
    }
    let w = &ctx.config.weights;
    Some(Recommendation {
        rule: RuleId::ThinContent,
        priority: Priority::Medium,
        title: "Increase Content Length".to_string(),
        estimated_time_range: "30-60 min".to_string(),
        description: format!(
            "Your page currently has only {words} words, which is significantly below the \
             recommended minimum of 600-1000 words for good SEO performance. Longer, \
             comprehensive content tends to rank better in search results because it provides \
             more value to users and more opportunities to target relevant keywords naturally."
        ),
        impact_statements: lines(&[
            "Better search rankings",
            "More keyword opportunities",
            "Higher user engagement",
            "Increased authority",
        ]),
        remediation_steps: lines(&[
            "Research your topic thoroughly",
            "Add detailed explanations and examples",
            "Include relevant statistics and data",
            "Add FAQ sections",
            "Expand on key points",
        ]),
        example_markup: None,
        best_practices: lines(&[
            "Aim for at least 600-1000 words",
            "Focus on quality over quantity",
            "Break content into scannable sections",
            "Use bullet points and lists",
            "Add relevant images and media",
            "Answer user questions thoroughly",
        ]),
        score_impact: ctx.impact(Category::Content, w.word_count_min + w.long_content),
    })
}

fn h2_subheadings(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.signals.h2_count > 0 {
        return None;
    }
    Some(Recommendation {
        rule: RuleId::MissingH2,
        priority: Priority::Low,
        title: "Add H2 Subheadings".to_string(),
        estimated_time_range: "15-20 min".to_string(),
        description: "Your page lacks H2 subheadings, which are important for organizing \
            content and improving readability. Subheadings break up long text, make content \
            scannable, and help search engines understand your content structure. They also \
            provide additional opportunities to include relevant keywords naturally."
            .to_string(),
        impact_statements: lines(&[
            "Better content organization",
            "Improved readability",
            "Enhanced user experience",
            "Additional keyword opportunities",
        ]),
        remediation_steps: lines(&[
            "Identify major sections in your content",
            "Add descriptive H2 tags for each section",
            "Include relevant keywords where appropriate",
        ]),
        example_markup: Some(
            "<h2>Why SEO Matters for Your Business</h2>\n<p>Content about SEO importance...</p>\n\n\
             <h2>Top SEO Strategies for 2025</h2>\n<p>Content about strategies...</p>"
                .to_string(),
        ),
        best_practices: lines(&[
            "Use H2 for major sections",
            "Make headings descriptive",
            "Include keywords naturally",
            "Keep headings concise",
            "Maintain logical flow",
        ]),
        score_impact: ctx.impact(Category::Content, ctx.config.weights.h2_present),
    })
}

fn https(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.signals.is_https {
        return None;
    }
    Some(Recommendation {
        rule: RuleId::InsecureScheme,
        priority: Priority::High,
        title: "Enable HTTPS Security".to_string(),
        estimated_time_range: "30-60 min".to_string(),
        description: "Your website is not using HTTPS, which means the connection is not \
            secure. HTTPS is a confirmed Google ranking factor, and modern browsers display \
            \"Not Secure\" warnings for HTTP sites. This damages user trust, reduces \
            conversions, and negatively impacts your search rankings. Enabling HTTPS is \
            essential for any modern website."
            .to_string(),
        impact_statements: lines(&[
            "Improved security and user trust",
            "Better search engine rankings",
            "Required for modern web features",
            "Increased conversion rates",
        ]),
        remediation_steps: lines(&[
            "Purchase or obtain a free SSL certificate (Let's Encrypt)",
            "Install the SSL certificate on your server",
            "Update all internal links to HTTPS",
            "Set up 301 redirects from HTTP to HTTPS",
            "Update your sitemap and robots.txt",
        ]),
        example_markup: None,
        best_practices: lines(&[
            "Use free Let's Encrypt certificates",
            "Enable HSTS (HTTP Strict Transport Security)",
            "Update all internal links",
            "Check for mixed content warnings",
            "Monitor certificate expiration",
        ]),
        score_impact: ctx.impact(Category::Technical, ctx.config.weights.https),
    })
}

fn links(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let total = ctx.signals.total_links;
    if total >= ctx.config.thresholds.link_count_min {
        return None;
    }
    Some(Recommendation {
        rule: RuleId::FewLinks,
        priority: Priority::Low,
        title: "Add More Internal Links".to_string(),
        estimated_time_range: "15-20 min".to_string(),
        description: format!(
            "Your page has only {total} links. Internal linking is crucial for SEO as it helps \
             search engines discover and index your content, distributes page authority, and \
             improves user navigation. A well-structured internal linking strategy keeps users \
             on your site longer and helps search engines understand your site's information \
             architecture."
        ),
        impact_statements: lines(&[
            "Better site structure",
            "Improved crawlability",
            "Enhanced user navigation",
            "Distributed page authority",
        ]),
        remediation_steps: lines(&[
            "Identify related pages on your site",
            "Add contextual links within content",
            "Use descriptive anchor text",
        ]),
        example_markup: Some(
            "<p>Learn more about <a href=\"/seo-tips\">advanced SEO techniques</a>\n\
             to improve your rankings.</p>"
                .to_string(),
        ),
        best_practices: lines(&[
            "Use descriptive anchor text",
            "Link to relevant pages only",
            "Aim for 3-5 internal links per page",
            "Avoid over-optimization",
            "Link to both new and important pages",
        ]),
        score_impact: ctx.impact(Category::Links, ctx.config.weights.link_count_min),
    })
}

fn schema_markup(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.signals.has_schema {
        return None;
    }
    Some(Recommendation {
        rule: RuleId::MissingSchema,
        priority: Priority::Low,
        title: "Add Schema Markup".to_string(),
        estimated_time_range: "20-30 min".to_string(),
        description: "Schema markup (structured data) helps search engines better understand \
            your content and can result in rich snippets in search results. Rich snippets can \
            include ratings, prices, availability, and other information that makes your \
            listing stand out, potentially increasing click-through rates by 20-30%."
            .to_string(),
        impact_statements: lines(&[
            "Rich snippets in search results",
            "Enhanced SERP appearance",
            "Better search engine understanding",
            "Increased click-through rates",
        ]),
        remediation_steps: lines(&[
            "Identify appropriate schema type (Article, Product, etc.)",
            "Use Google's Structured Data Markup Helper",
            "Add JSON-LD script to your page",
            "Test with Google's Rich Results Test",
        ]),
        example_markup: Some(
            r#"<script type="application/ld+json">
{
  "@context": "https://schema.org",
  "@type": "Article",
  "headline": "Your Article Title",
  "author": {
    "@type": "Person",
    "name": "Author Name"
  },
  "datePublished": "2025-10-29"
}
</script>"#
                .to_string(),
        ),
        best_practices: lines(&[
            "Use JSON-LD format (Google recommended)",
            "Choose the most specific schema type",
            "Test with Google's validation tools",
            "Keep markup up to date",
            "Include all required properties",
        ]),
        // not part of the rubric
        score_impact: None,
    })
}
