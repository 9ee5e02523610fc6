// 🎨 Catalog - What the studio offers and what it costs

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub slug: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    /// Starting price in USD
    pub starting_price: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: &'static str,
    /// Price in USD
    pub price: u32,
    pub includes: Vec<&'static str>,
}

pub fn services() -> Vec<Service> {
    vec![
        Service {
            slug: "branding",
            name: "Brand Identity",
            summary: "Logo, palette, type system and a guide your team can actually use.",
            starting_price: 1200,
        },
        Service {
            slug: "website",
            name: "Web Design",
            summary: "Landing pages and small sites, designed and built to ship.",
            starting_price: 1800,
        },
        Service {
            slug: "video",
            name: "Video Production",
            summary: "Promo spots, product films and short-form edits for social.",
            starting_price: 900,
        },
        Service {
            slug: "photography",
            name: "Photography",
            summary: "Product, portrait and event shoots with retouched deliverables.",
            starting_price: 600,
        },
        Service {
            slug: "motion",
            name: "Motion Design",
            summary: "Animated logos, explainers and UI motion.",
            starting_price: 800,
        },
    ]
}

pub fn pricing() -> Vec<PricingTier> {
    vec![
        PricingTier {
            name: "Starter",
            price: 500,
            includes: vec!["One deliverable", "Two revision rounds", "Two-week turnaround"],
        },
        PricingTier {
            name: "Studio",
            price: 1500,
            includes: vec![
                "Up to three deliverables",
                "Creative direction session",
                "Four revision rounds",
            ],
        },
        PricingTier {
            name: "Signature",
            price: 4000,
            includes: vec![
                "Full campaign package",
                "Dedicated producer",
                "Unlimited revisions within scope",
                "Priority scheduling",
            ],
        },
    ]
}

/// Look up a service by slug
pub fn find_service(slug: &str) -> Option<Service> {
    services().into_iter().find(|s| s.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProjectType;

    #[test]
    fn test_every_service_is_a_bookable_project_type() {
        for service in services() {
            assert!(
                service.slug.parse::<ProjectType>().is_ok(),
                "{} has no matching project type",
                service.slug
            );
        }
    }

    #[test]
    fn test_pricing_tiers_ascend() {
        let prices: Vec<u32> = pricing().iter().map(|t| t.price).collect();
        let mut sorted = prices.clone();
        sorted.sort();
        assert_eq!(prices, sorted);
    }

    #[test]
    fn test_find_service() {
        assert_eq!(find_service("video").map(|s| s.name), Some("Video Production"));
        assert!(find_service("catering").is_none());
    }
}
