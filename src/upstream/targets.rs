//! Scrape Target Module
//!
//! Site URLs handed to the scraping backend for each gateway route.

use std::fmt;

use urlencoding::encode;

const AMAZON: &str = "https://www.amazon.com";
const EBAY: &str = "https://www.ebay.com";

// == Scrape Target ==
/// A page on one of the supported sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeTarget {
    AmazonProduct { product_id: String },
    AmazonReviews { product_id: String },
    AmazonOffers { product_id: String },
    AmazonSearch { query: String },
    EbayProduct { product_id: String },
    EbaySellerItems { seller_id: String },
    EbaySearch { query: String },
    EbayCategory { category_id: String },
}

impl ScrapeTarget {
    /// The page URL to scrape. Identifiers and search terms are
    /// percent-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use scraper_gateway::upstream::ScrapeTarget;
    ///
    /// let target = ScrapeTarget::AmazonSearch { query: "usb hub".to_string() };
    /// assert_eq!(target.url(), "https://www.amazon.com/s?k=usb%20hub");
    /// ```
    pub fn url(&self) -> String {
        match self {
            ScrapeTarget::AmazonProduct { product_id } => {
                format!("{}/dp/{}", AMAZON, encode(product_id))
            }
            ScrapeTarget::AmazonReviews { product_id } => {
                format!("{}/product-reviews/{}", AMAZON, encode(product_id))
            }
            ScrapeTarget::AmazonOffers { product_id } => {
                format!("{}/gp/offer-listing/{}", AMAZON, encode(product_id))
            }
            ScrapeTarget::AmazonSearch { query } => format!("{}/s?k={}", AMAZON, encode(query)),
            ScrapeTarget::EbayProduct { product_id } => {
                format!("{}/itm/{}", EBAY, encode(product_id))
            }
            ScrapeTarget::EbaySellerItems { seller_id } => {
                let seller = encode(seller_id);
                format!(
                    "{}/sch/m.html?_ssn={}&_from=R40&_trksid=p2499338.m570.l1313&_nkw={}&_sacat=0",
                    EBAY, seller, seller
                )
            }
            ScrapeTarget::EbaySearch { query } => {
                format!("{}/sch/i.html?_nkw={}", EBAY, encode(query))
            }
            ScrapeTarget::EbayCategory { category_id } => {
                format!("{}/b/{}", EBAY, encode(category_id))
            }
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeTarget::AmazonProduct { .. } => "amazon_product",
            ScrapeTarget::AmazonReviews { .. } => "amazon_reviews",
            ScrapeTarget::AmazonOffers { .. } => "amazon_offers",
            ScrapeTarget::AmazonSearch { .. } => "amazon_search",
            ScrapeTarget::EbayProduct { .. } => "ebay_product",
            ScrapeTarget::EbaySellerItems { .. } => "ebay_seller_items",
            ScrapeTarget::EbaySearch { .. } => "ebay_search",
            ScrapeTarget::EbayCategory { .. } => "ebay_category",
        }
    }
}

impl fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
