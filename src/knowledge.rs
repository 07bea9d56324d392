//! Local Roblox knowledge base for the free chat assistant.
//!
//! Answers come from a fixed keyword table instead of a provider call.
//! Lookup is an exact key match first, then plain word overlap.

use std::collections::HashSet;

/// Key of the entry returned when nothing else matches.
pub const DEFAULT_KEY: &str = "default";

/// One canned answer, keyed by a lowercase keyword or short phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub key: &'static str,
    pub response: &'static str,
}

const fn entry(key: &'static str, response: &'static str) -> KnowledgeEntry {
    KnowledgeEntry { key, response }
}

/// Roblox/Luau topics, in match priority order.
const ROBLOX_ENTRIES: &[KnowledgeEntry] = &[
    entry(
        "variable",
        "In Roblox Luau, create variables using 'local':\n\nlocal myNumber = 10\nlocal myString = \"Hello\"\nlocal myPart = workspace.Part\n\nFor persistent data, use attributes or ReplicatedStorage.",
    ),
    entry(
        "function",
        "To create a function:\n\nlocal function greet(player)\n    print(\"Hello, \" .. player.Name)\n    return \"Welcome!\"\nend\n\ngreet(game.Players.LocalPlayer)",
    ),
    entry(
        "event",
        "Common Roblox events:\n\n-- Touched event\npart.Touched:Connect(function(hit)\n    print(hit.Name .. \" was touched\")\nend)\n\n-- Player events\nplayer.Chatted:Connect(function(msg)\n    print(player.Name .. \" said: \" .. msg)\nend)",
    ),
    entry(
        "loop",
        "Common loops:\n\n-- For loop\nfor i = 1, 10 do print(i) end\n\n-- While loop\nwhile true do wait() end\n\n-- ForEach\nfor _, part in pairs(workspace:GetChildren()) do print(part.Name) end",
    ),
    entry(
        "table",
        "Tables in Luau:\n\n-- Array\nlocal colors = {\"Red\", \"Blue\"}\nprint(colors[1])\n\n-- Dictionary\nlocal data = {Name = \"Player1\", Score = 100}",
    ),
    entry(
        "remote",
        "RemoteEvents for client-server:\n\n-- Server:\nlocal re = Instance.new(\"RemoteEvent\")\nre.Name = \"MyEvent\"\nre.Parent = ReplicatedStorage\nre.OnServerEvent:Connect(function(p, msg) print(p.Name..\": \"..msg) end)\n\n-- Client:\nReplicatedStorage.MyEvent:FireServer(\"Hello!\")",
    ),
    entry(
        "leaderstats",
        "Creating a leaderboard:\n\nlocal function createLeaderstats(player)\n    local ls = Instance.new(\"Folder\")\n    ls.Name = \"leaderstats\"\n    ls.Parent = player\n    local score = Instance.new(\"IntValue\")\n    score.Name = \"Score\"\n    score.Value = 0\n    score.Parent = ls\nend\n\ngame.Players.PlayerAdded:Connect(createLeaderstats)",
    ),
    entry(
        "part",
        "Creating parts:\n\nlocal part = Instance.new(\"Part\")\npart.Size = Vector3.new(4, 1, 4)\npart.Position = Vector3.new(0, 5, 0)\npart.BrickColor = BrickColor.new(\"Bright red\")\npart.Anchored = true\npart.Parent = workspace",
    ),
    entry(
        "building",
        "Building tips:\n1. Use Anchored = true for stationary parts\n2. Group parts into Models\n3. Use UnionOperations for complex shapes\n4. Use PivotTo for positioning\n5. Enable Collision for interactions",
    ),
    entry(
        "humanoid",
        "Working with Humanoids:\n\nlocal h = part.Parent:FindFirstChildWhichIsA(\"Humanoid\")\nif h then\n    h.Health = 100\n    h.WalkSpeed = 16\n    h.JumpPower = 50\nend",
    ),
    entry(
        "animation",
        "Creating animations:\n1. Use Animation Editor plugin\n2. Save to ReplicatedStorage\n3. Load:\nlocal anim = Instance.new(\"Animation\")\nanim.AnimationId = \"rbxassetid://ID\"\nlocal track = humanoid:LoadAnimation(anim)\ntrack:Play()",
    ),
    entry(
        "ui",
        "Creating UI:\n\nlocal sg = Instance.new(\"ScreenGui\")\nsg.Parent = game:GetService(\"StarterGui\")\nlocal label = Instance.new(\"TextLabel\")\nlabel.Size = UDim2.new(0,200,0,50)\nlabel.Text = \"Hello!\"\nlabel.Parent = sg",
    ),
    entry(
        "tween",
        "Using Tweens:\n\nlocal ti = TweenInfo.new(1, Enum.EasingStyle.Quad)\nlocal goal = {Position = Vector3.new(10,5,0)}\nlocal tween = game:GetService(\"TweenService\"):Create(part, ti, goal)\ntween:Play()",
    ),
    entry(
        "physics",
        "Physics tips:\n1. Enable Collisions\n2. Use BodyGyro/BodyVelocity\n3. Use Constraints for joints\n4. Adjust CustomPhysicalProperties",
    ),
    entry(
        "workspace",
        "Workspace contains all objects:\n\nfor _, part in pairs(workspace:GetChildren()) do\n    if part:IsA(\"BasePart\") then print(part.Name) end\nend",
    ),
    entry(
        "replicatedstorage",
        "ReplicatedStorage for shared data:\n\nlocal rs = game:GetService(\"ReplicatedStorage\")\nlocal re = Instance.new(\"RemoteEvent\")\nre.Name = \"MyEvent\"\nre.Parent = rs",
    ),
    entry(
        "datastore",
        "Using DataStore:\n\nlocal ds = game:GetService(\"DataStoreService\")\nlocal store = ds:GetDataStore(\"MyData\")\n\n-- Save: store:SetAsync(player.UserId, {Score=100})\n-- Load: local data = store:GetAsync(player.UserId)",
    ),
    entry(
        "clickdetector",
        "Using ClickDetector:\n\nlocal cd = Instance.new(\"ClickDetector\")\ncd.Parent = part\ncd.MouseClick:Connect(function(player)\n    print(player.Name..\" clicked!\")\nend)",
    ),
    entry(
        "tool",
        "Creating a Tool:\n\nlocal tool = Instance.new(\"Tool\")\ntool.Name = \"MyTool\"\nlocal handle = Instance.new(\"Part\")\nhandle.Name = \"Handle\"\nhandle.Parent = tool\ntool.Parent = game:GetService(\"StarterPack\")",
    ),
    entry(
        "pathfinding",
        "Using PathfindingService:\n\nlocal ps = game:GetService(\"PathfindingService\")\nlocal path = ps:CreatePath()\npath:ComputeAsync(startPos, endPos)\nlocal waypoints = path:GetWaypoints()",
    ),
    entry(
        "scripting",
        "Roblox scripting basics:\n1. Use 'local' for variables\n2. Use functions to organize code\n3. Connect events with :Connect()\n4. Use services like Players, Workspace\n5. Use : for methods, . for properties",
    ),
    entry(
        "error",
        "Common errors:\n1. 'Attempt to index nil' - Check if object exists\n2. 'Expected x got y' - Check data types\n3. 'Unable to cast' - Use correct type\n4. 'Stack trace' - Check infinite loops",
    ),
    entry(
        "help",
        "I'm your Roblox assistant! Ask me about:\n- Scripting (variables, functions, loops, tables)\n- Building (parts, models, physics)\n- UI (ScreenGui, labels, buttons)\n- Events (Touched, Clicked, Chatted)\n- Services (Pathfinding, DataStore)\n\nJust describe what you need!",
    ),
    entry(
        "how to",
        "Just tell me what you want! Like:\n- 'How do I make a part move?'\n- 'How do I detect clicks?'\n- 'How do I save data?'\n\nI'll give you the code!",
    ),
    entry(
        DEFAULT_KEY,
        "I'm Speedy AI, your Roblox helper! I can help with:\n\n📝 Scripting - variables, functions, events\n🏗️ Building - parts, models, physics\n🎨 UI - ScreenGui, labels, buttons\n💾 Data - DataStore, leaderstats\n🔧 Tools - Pathfinding, animations\n\nWhat would you like help with?",
    ),
];

/// Immutable keyword table with word-overlap lookup.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    default_response: &'static str,
}

impl KnowledgeBase {
    /// Build a knowledge base from entries in priority order.
    ///
    /// `default_response` answers queries that share no word with any key.
    pub fn new(entries: Vec<KnowledgeEntry>, default_response: &'static str) -> Self {
        Self {
            entries,
            default_response,
        }
    }

    /// The built-in Roblox scripting table.
    pub fn roblox() -> Self {
        let default_response = ROBLOX_ENTRIES
            .iter()
            .find(|e| e.key == DEFAULT_KEY)
            .map(|e| e.response)
            .unwrap_or("I'm Speedy AI, your Roblox helper!");
        Self::new(ROBLOX_ENTRIES.to_vec(), default_response)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn default_response(&self) -> &'static str {
        self.default_response
    }

    /// Find the best canned answer for a free-text query. Never fails.
    pub fn find_best_match(&self, query: &str) -> &'static str {
        let query = query.to_lowercase();

        if let Some(exact) = self.entries.iter().find(|e| e.key == query) {
            return exact.response;
        }

        let query_words: HashSet<&str> = query.split_whitespace().collect();

        let mut best: Option<&KnowledgeEntry> = None;
        let mut best_score = 0;
        for entry in &self.entries {
            let score = overlap_score(&query_words, entry.key);
            // Strictly greater, so the earliest key wins a tie.
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        best.map_or(self.default_response, |e| e.response)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::roblox()
    }
}

/// Number of distinct words `key` shares with the query word set.
pub fn overlap_score(query_words: &HashSet<&str>, key: &str) -> usize {
    let key_lower = key.to_lowercase();
    let key_words: HashSet<&str> = key_lower.split_whitespace().collect();
    query_words.intersection(&key_words).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> HashSet<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn exact_key_match_returns_its_response() {
        let kb = KnowledgeBase::roblox();
        for entry in kb.entries() {
            assert_eq!(kb.find_best_match(entry.key), entry.response, "key {}", entry.key);
        }
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let kb = KnowledgeBase::roblox();
        let tween = kb.entries().iter().find(|e| e.key == "tween").unwrap();
        assert_eq!(kb.find_best_match("TWEEN"), tween.response);
    }

    #[test]
    fn part_question_gets_part_answer() {
        let kb = KnowledgeBase::roblox();
        let answer = kb.find_best_match("how do I make a part");
        assert!(answer.contains("Instance.new(\"Part\")"));
        assert!(answer.starts_with("Creating parts"));
    }

    #[test]
    fn unrelated_query_gets_default_response() {
        let kb = KnowledgeBase::roblox();
        assert_eq!(kb.find_best_match("what is the weather like"), kb.default_response());
        assert_eq!(kb.find_best_match(""), kb.default_response());
        assert_eq!(kb.find_best_match("   "), kb.default_response());
    }

    #[test]
    fn multi_word_key_beats_single_word_overlap() {
        let kb = KnowledgeBase::roblox();
        let how_to = kb.entries().iter().find(|e| e.key == "how to").unwrap();
        // "how to" shares two words, every other key at most one.
        assert_eq!(kb.find_best_match("how to save data"), how_to.response);
    }

    #[test]
    fn ties_go_to_the_first_declared_key() {
        let kb = KnowledgeBase::roblox();
        // "loop" is declared before "table"; both score one.
        let loop_entry = kb.entries().iter().find(|e| e.key == "loop").unwrap();
        assert_eq!(kb.find_best_match("table loop"), loop_entry.response);
    }

    #[test]
    fn punctuation_is_not_stripped() {
        let kb = KnowledgeBase::roblox();
        // "part?" is a different word from "part".
        assert_eq!(kb.find_best_match("part?"), kb.default_response());
    }

    #[test]
    fn every_answer_is_non_empty() {
        let kb = KnowledgeBase::roblox();
        for query in ["", "x", "event loop", "Help me", "default"] {
            assert!(!kb.find_best_match(query).is_empty());
        }
    }

    #[test]
    fn custom_table_uses_its_own_default() {
        let kb = KnowledgeBase::new(vec![entry("alpha beta", "ab")], "fallback");
        assert_eq!(kb.find_best_match("beta"), "ab");
        assert_eq!(kb.find_best_match("gamma"), "fallback");
    }

    #[test]
    fn overlap_counts_distinct_shared_words() {
        assert_eq!(overlap_score(&words("how to how"), "how to"), 2);
        assert_eq!(overlap_score(&words("make a part"), "part"), 1);
        assert_eq!(overlap_score(&words("make a door"), "part"), 0);
    }
}
