use std::collections::HashMap;

/// Represents a robots.txt rule (either Allow or Disallow)
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    is_allow: bool,
}

/// Parsed robots.txt for the audited site
#[derive(Debug, Default)]
pub struct RobotsRules {
    /// Rules grouped by user-agent (lowercased)
    groups: HashMap<String, Vec<Rule>>,
    /// Sitemap URLs declared in the file
    sitemaps: Vec<String>,
}

impl RobotsRules {
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules: Vec<Rule> = Vec::new();
        let mut in_rules = false;

        for line in content.lines() {
            // Strip inline comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    // Consecutive user-agent lines share one group
                    if in_rules {
                        robots.save_group(&current_agents, &current_rules);
                        current_agents.clear();
                        current_rules.clear();
                        in_rules = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" | "allow" => {
                    in_rules = true;
                    if !value.is_empty() {
                        current_rules.push(Rule {
                            pattern: value.to_string(),
                            is_allow: field == "allow",
                        });
                    }
                }
                "sitemap" => {
                    // Sitemap lines are global, not tied to a group
                    if !value.is_empty() {
                        robots.sitemaps.push(value.to_string());
                    }
                }
                _ => {}
            }
        }

        robots.save_group(&current_agents, &current_rules);
        robots
    }

    fn save_group(&mut self, agents: &[String], rules: &[Rule]) {
        for agent in agents {
            self.groups
                .entry(agent.clone())
                .or_default()
                .extend(rules.iter().cloned());
        }
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks if a path may be crawled by `user_agent`, falling back to the `*` group
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        if let Some(rules) = self.groups.get(&user_agent.to_lowercase()) {
            return check_rules(rules, path);
        }
        if let Some(rules) = self.groups.get("*") {
            return check_rules(rules, path);
        }
        true
    }

    /// Configured paths the wildcard group disallows, in input order
    pub fn blocked_paths<'a>(&self, paths: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        paths
            .into_iter()
            .filter(|path| !self.is_allowed(path, "*"))
            .cloned()
            .collect()
    }
}

/// Longest matching pattern wins; Allow wins a tie
fn check_rules(rules: &[Rule], path: &str) -> bool {
    let mut allowed = true;
    let mut best: Option<usize> = None;

    for rule in rules {
        if !path_matches(&rule.pattern, path) {
            continue;
        }
        let len = rule.pattern.len();
        match best {
            Some(current) if len < current => {}
            Some(current) if len == current => allowed = allowed || rule.is_allow,
            _ => {
                best = Some(len);
                allowed = rule.is_allow;
            }
        }
    }

    allowed
}

/// Checks if a path matches a pattern (supports * and $ wildcards)
fn path_matches(pattern: &str, path: &str) -> bool {
    let (pattern, must_end) = match pattern.strip_suffix('$') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };

    if !pattern.contains('*') {
        return if must_end {
            path == pattern
        } else {
            path.starts_with(pattern)
        };
    }

    let pattern_chars: Vec<char> = pattern.chars().collect();
    let path_chars: Vec<char> = path.chars().collect();
    wildcard_match(&pattern_chars, &path_chars, must_end)
}

fn wildcard_match(pattern: &[char], path: &[char], must_end: bool) -> bool {
    match pattern.split_first() {
        None => !must_end || path.is_empty(),
        Some(('*', rest)) => (0..=path.len()).any(|i| wildcard_match(rest, &path[i..], must_end)),
        Some((c, rest)) => path
            .split_first()
            .is_some_and(|(p, path_rest)| p == c && wildcard_match(rest, path_rest, must_end)),
    }
}
