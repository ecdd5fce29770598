//! TEI fixtures

/// Act 1: A, B, C and D enter, A speaks two lines (six words), D leaves.
/// Act 2: E speaks one line of two words without an entrance.
pub const TOY_PLAY: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <text>
    <front>
      <castList>
        <castItem xml:id="A_Toy"><role><name>A</name></role></castItem>
        <castItem xml:id="B_Toy"/>
        <castItem xml:id="C_Toy"/>
        <castItem xml:id="D_Toy" corresp="#C_Toy"/>
        <castItem xml:id="E_Toy"/>
      </castList>
    </front>
    <body>
      <div xml:id="act-1" type="act" n="1">
        <head><w xml:id="w-00a">ACT</w></head>
        <div xml:id="sc-1-1" type="scene" n="1">
          <stage xml:id="stg-01" type="entrance" who="#A_Toy #B_Toy #C_Toy #D_Toy"><w xml:id="w-00b" n="SD 1.1.0">Enter</w></stage>
          <sp xml:id="sp-01" who="#A_Toy">
            <speaker xml:id="spk-01"><w xml:id="w-00c">A</w></speaker>
            <l xml:id="l-01" n="1.1.1"><w xml:id="w-01" n="1.1.1">Now</w><c> </c><w xml:id="w-02" n="1.1.1">fair</w><c> </c><w xml:id="w-03" n="1.1.1">friends</w></l>
            <l xml:id="l-02" n="1.1.2"><w xml:id="w-04" n="1.1.2">our</w><c> </c><w xml:id="w-05" n="1.1.2">hour</w><c> </c><w xml:id="w-06" n="1.1.2">draws</w></l>
          </sp>
          <stage xml:id="stg-02" type="exit" who="#D_Toy"/>
        </div>
      </div>
      <div xml:id="act-2" type="act" n="2">
        <div xml:id="sc-2-1" type="scene" n="1">
          <sp xml:id="sp-02" who="#E_Toy">
            <l xml:id="l-03" n="2.1.1"><w xml:id="w-07" n="2.1.1">Four</w><c> </c><w xml:id="w-08" n="2.1.1">days</w></l>
          </sp>
        </div>
      </div>
    </body>
  </text>
</TEI>
"##;

/// A enters in scene 1 and never leaves; B speaks in scene 2.
pub const FLUSH_PLAY: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <text>
    <body>
      <div xml:id="act-1" type="act" n="1">
        <div xml:id="sc-1-1" type="scene" n="1">
          <stage xml:id="stg-01" type="entrance" who="#A_Toy"/>
          <sp xml:id="sp-01" who="#A_Toy">
            <l xml:id="l-01" n="1.1.1"><w xml:id="w-01" n="1.1.1">Stay</w></l>
          </sp>
        </div>
        <div xml:id="sc-1-2" type="scene" n="2">
          <sp xml:id="sp-02" who="#B_Toy">
            <l xml:id="l-02" n="1.2.1"><w xml:id="w-02" n="1.2.1">Go</w></l>
          </sp>
        </div>
      </div>
    </body>
  </text>
</TEI>
"##;

/// A speech act without `who` (a song) between two attributed ones.
pub const SONG_PLAY: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <text>
    <body>
      <div xml:id="act-1" type="act" n="1">
        <stage xml:id="stg-01" type="entrance" who="#A_Toy #B_Toy"/>
        <sp xml:id="sp-01" who="#A_Toy">
          <l xml:id="l-01" n="1.0.1"><w xml:id="w-01" n="1.0.1">Sing</w></l>
        </sp>
        <sp xml:id="sp-02">
          <lg><l xml:id="l-02" n="1.0.2"><w xml:id="w-02" n="1.0.2">La</w><c> </c><w xml:id="w-03" n="1.0.2">la</w></l></lg>
        </sp>
        <sp xml:id="sp-03" who="#B_Toy #A_Toy">
          <l xml:id="l-03" n="1.0.3"><w xml:id="w-04" n="1.0.3">Well</w><c> </c><w xml:id="w-05" n="1.0.3">sung</w></l>
        </sp>
      </div>
    </body>
  </text>
</TEI>
"##;

/// An aggregate table with two scenes of three characters
pub const TOY_AGGREGATE_CSV: &str = "\
act,scene,stagegroup,stagegroup_raw,setting,onstage,speaker,n_lines,n_tokens
1,1,1,1,1,#A_Toy #B_Toy,#A_Toy,3,12
1,1,1,1,2,#A_Toy #B_Toy,#B_Toy,1,4
1,1,2,3,3,#A_Toy #B_Toy #C_Toy,#C_Toy,2,9
1,2,3,4,4,#B_Toy #C_Toy,#B_Toy,5,20
";
