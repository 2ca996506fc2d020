//! Browser identity (user agent) generation.
//!
//! A fixed, ordered table of weighted templates. Each template builds one
//! flavor of user agent string from randomized version and device fields.
//! Randomness is always supplied by the caller so tests can seed it.

use rand::{Rng, RngCore};

const WEBKIT_VERSIONS: &[&str] = &["605.1.15", "604.1.38", "605.2.17"];
const WECHAT_VERSIONS: &[&str] = &["8.0.50", "8.0.54", "8.0.64", "8.0.70", "8.0.75"];
const NET_TYPES: &[&str] = &["WIFI", "4G", "5G"];
const MAC_VERSIONS: &[&str] = &["10_15_7", "11_6_8", "12_6_9", "13_5_2", "14_0"];
const WINDOWS_VERSIONS: &[&str] = &["Windows NT 10.0", "Windows NT 11.0"];

const WECHAT_ANDROID_DEVICES: &[&str] = &[
    "HUAWEI VOG-AL00",
    "HUAWEI P30",
    "Xiaomi MI 11",
    "OPPO R15",
    "vivo X60",
    "Samsung SM-G9980",
];

const CHROME_ANDROID_DEVICES: &[&str] = &[
    "Pixel 6",
    "SM-G991B",
    "SM-A525F",
    "Redmi Note 11",
    "ONEPLUS A6000",
];

/// A named, weighted user agent builder.
pub struct IdentityTemplate {
    pub name: &'static str,
    pub weight: u32,
    build: fn(&mut dyn RngCore) -> String,
}

impl IdentityTemplate {
    pub fn build(&self, rng: &mut dyn RngCore) -> String {
        (self.build)(rng)
    }
}

impl std::fmt::Debug for IdentityTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityTemplate")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Template table, in selection order. Weights sum to 100.
pub static TEMPLATES: &[IdentityTemplate] = &[
    IdentityTemplate { name: "iPhone-Wechat", weight: 35, build: iphone_wechat },
    IdentityTemplate { name: "Android-Wechat", weight: 30, build: android_wechat },
    IdentityTemplate { name: "iPhone-Safari", weight: 15, build: iphone_safari },
    IdentityTemplate { name: "Android-Chrome", weight: 5, build: android_chrome },
    IdentityTemplate { name: "Windows-Chrome", weight: 5, build: windows_chrome },
    IdentityTemplate { name: "Mac-Safari", weight: 4, build: mac_safari },
    IdentityTemplate { name: "Mac-Chrome", weight: 3, build: mac_chrome },
    IdentityTemplate { name: "iPad", weight: 3, build: ipad },
];

fn total_weight() -> u32 {
    TEMPLATES.iter().map(|t| t.weight).sum()
}

/// Walks the table subtracting weights until `r` falls inside an entry.
/// Out-of-range draws land on the first template.
fn template_at(mut r: u32) -> &'static IdentityTemplate {
    for template in TEMPLATES {
        if r < template.weight {
            return template;
        }
        r -= template.weight;
    }
    &TEMPLATES[0]
}

/// Picks a template with probability proportional to its weight.
pub fn select<R: Rng>(rng: &mut R) -> &'static IdentityTemplate {
    let r = rng.gen_range(0..total_weight());
    template_at(r)
}

pub fn find(name: &str) -> Option<&'static IdentityTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

pub fn generate_random<R: Rng>(rng: &mut R) -> String {
    select(rng).build(rng)
}

/// Builds a user agent from the named template.
///
/// Unknown names fall back to a weighted random pick instead of failing,
/// so callers can pass through whatever type a client asked for.
pub fn generate<R: Rng>(name: Option<&str>, rng: &mut R) -> String {
    match name.and_then(find) {
        Some(template) => template.build(rng),
        None => generate_random(rng),
    }
}

pub fn list_types() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}

/// `count` independent random draws; repeats are allowed.
pub fn generate_many<R: Rng>(count: usize, rng: &mut R) -> Vec<String> {
    (0..count).map(|_| generate_random(rng)).collect()
}

fn pick(rng: &mut dyn RngCore, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

/// `major_minor_patch`, the underscore form iOS puts in its user agent.
fn ios_version(rng: &mut dyn RngCore, min: u32, max: u32) -> String {
    let major = rng.gen_range(min..=max);
    let minor = rng.gen_range(0..10);
    let patch = rng.gen_range(0..10);
    format!("{}_{}_{}", major, minor, patch)
}

fn android_version(rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(8..=14)
}

fn chromium_major(rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(90..=119)
}

fn iphone_wechat(rng: &mut dyn RngCore) -> String {
    let ios = ios_version(rng, 13, 18);
    let webkit = pick(rng, WEBKIT_VERSIONS);
    let wechat = pick(rng, WECHAT_VERSIONS);
    let net = pick(rng, NET_TYPES);
    format!(
        "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) AppleWebKit/{} (KHTML, like Gecko) Mobile/15E148 MicroMessenger/{}(0x18004029) NetType/{} Language/zh_CN",
        ios, webkit, wechat, net
    )
}

fn android_wechat(rng: &mut dyn RngCore) -> String {
    let android = android_version(rng);
    let wechat = pick(rng, WECHAT_VERSIONS);
    let net = pick(rng, NET_TYPES);
    let device = pick(rng, WECHAT_ANDROID_DEVICES);
    format!(
        "Mozilla/5.0 (Linux; Android {}; {} Build/HUAWEIVOG-AL00) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/86.0.4240.99 Mobile Safari/537.36 MicroMessenger/{} NetType/{} Language/zh_CN",
        android, device, wechat, net
    )
}

fn iphone_safari(rng: &mut dyn RngCore) -> String {
    let ios = ios_version(rng, 13, 18);
    let webkit = pick(rng, WEBKIT_VERSIONS);
    let safari = pick(rng, &["604.1", "605.1.15", "537.36"]);
    format!(
        "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) AppleWebKit/{} (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/{}",
        ios, webkit, safari
    )
}

fn android_chrome(rng: &mut dyn RngCore) -> String {
    let android = android_version(rng);
    let chrome = chromium_major(rng);
    let device = pick(rng, CHROME_ANDROID_DEVICES);
    format!(
        "Mozilla/5.0 (Linux; Android {}; {}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Mobile Safari/537.36",
        android, device, chrome
    )
}

fn windows_chrome(rng: &mut dyn RngCore) -> String {
    let chrome = chromium_major(rng);
    let windows = pick(rng, WINDOWS_VERSIONS);
    let arch = pick(rng, &["Win64; x64", "WOW64"]);
    format!(
        "Mozilla/5.0 ({}; {}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
        windows, arch, chrome
    )
}

fn mac_safari(rng: &mut dyn RngCore) -> String {
    let mac = pick(rng, MAC_VERSIONS);
    let webkit = pick(rng, &["605.1.15", "604.1.38", "537.36"]);
    let safari = pick(rng, &["605.1.15", "604.1", "537.36"]);
    format!(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X {}) AppleWebKit/{} (KHTML, like Gecko) Version/16.0 Safari/{}",
        mac, webkit, safari
    )
}

fn mac_chrome(rng: &mut dyn RngCore) -> String {
    let chrome = chromium_major(rng);
    let mac = pick(rng, MAC_VERSIONS);
    format!(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X {}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
        mac, chrome
    )
}

fn ipad(rng: &mut dyn RngCore) -> String {
    let ios = ios_version(rng, 13, 17);
    let webkit = pick(rng, &["605.1.15", "604.1.38"]);
    format!(
        "Mozilla/5.0 (iPad; CPU OS {} like Mac OS X) AppleWebKit/{} (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
        ios, webkit
    )
}
