//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// Bundled subset of the IANA IPFIX Information Element registry, in IESpec
// form. Covers the elements commonly seen in flow export; deployments
// needing the complete or a private model load it with
// `registry::use_specfile`.
//
// IANA registry:
// https://www.iana.org/assignments/ipfix/ipfix.xhtml#ipfix-information-elements
pub(crate) const IANA_IESPECS: &[&str] = &[
    "octetDeltaCount(1)<unsigned64>",
    "packetDeltaCount(2)<unsigned64>",
    "deltaFlowCount(3)<unsigned64>",
    "protocolIdentifier(4)<unsigned8>",
    "ipClassOfService(5)<unsigned8>",
    "tcpControlBits(6)<unsigned16>",
    "sourceTransportPort(7)<unsigned16>",
    "sourceIPv4Address(8)<ipv4Address>",
    "sourceIPv4PrefixLength(9)<unsigned8>",
    "ingressInterface(10)<unsigned32>",
    "destinationTransportPort(11)<unsigned16>",
    "destinationIPv4Address(12)<ipv4Address>",
    "destinationIPv4PrefixLength(13)<unsigned8>",
    "egressInterface(14)<unsigned32>",
    "ipNextHopIPv4Address(15)<ipv4Address>",
    "bgpSourceAsNumber(16)<unsigned32>",
    "bgpDestinationAsNumber(17)<unsigned32>",
    "bgpNextHopIPv4Address(18)<ipv4Address>",
    "postMCastPacketDeltaCount(19)<unsigned64>",
    "postMCastOctetDeltaCount(20)<unsigned64>",
    "flowEndSysUpTime(21)<unsigned32>",
    "flowStartSysUpTime(22)<unsigned32>",
    "postOctetDeltaCount(23)<unsigned64>",
    "postPacketDeltaCount(24)<unsigned64>",
    "minimumIpTotalLength(25)<unsigned64>",
    "maximumIpTotalLength(26)<unsigned64>",
    "sourceIPv6Address(27)<ipv6Address>",
    "destinationIPv6Address(28)<ipv6Address>",
    "sourceIPv6PrefixLength(29)<unsigned8>",
    "destinationIPv6PrefixLength(30)<unsigned8>",
    "flowLabelIPv6(31)<unsigned32>",
    "icmpTypeCodeIPv4(32)<unsigned16>",
    "igmpType(33)<unsigned8>",
    "samplingInterval(34)<unsigned32>",
    "samplingAlgorithm(35)<unsigned8>",
    "flowActiveTimeout(36)<unsigned16>",
    "flowIdleTimeout(37)<unsigned16>",
    "engineType(38)<unsigned8>",
    "engineId(39)<unsigned8>",
    "exportedOctetTotalCount(40)<unsigned64>",
    "exportedMessageTotalCount(41)<unsigned64>",
    "exportedFlowRecordTotalCount(42)<unsigned64>",
    "ipv4RouterSc(43)<ipv4Address>",
    "sourceIPv4Prefix(44)<ipv4Address>",
    "destinationIPv4Prefix(45)<ipv4Address>",
    "mplsTopLabelType(46)<unsigned8>",
    "mplsTopLabelIPv4Address(47)<ipv4Address>",
    "minimumTTL(52)<unsigned8>",
    "maximumTTL(53)<unsigned8>",
    "fragmentIdentification(54)<unsigned32>",
    "postIpClassOfService(55)<unsigned8>",
    "sourceMacAddress(56)<macAddress>",
    "postDestinationMacAddress(57)<macAddress>",
    "vlanId(58)<unsigned16>",
    "postVlanId(59)<unsigned16>",
    "ipVersion(60)<unsigned8>",
    "flowDirection(61)<unsigned8>",
    "ipNextHopIPv6Address(62)<ipv6Address>",
    "bgpNextHopIPv6Address(63)<ipv6Address>",
    "ipv6ExtensionHeaders(64)<unsigned32>",
    "mplsTopLabelStackSection(70)<octetArray>",
    "mplsLabelStackSection2(71)<octetArray>",
    "mplsLabelStackSection3(72)<octetArray>",
    "mplsLabelStackSection4(73)<octetArray>",
    "mplsLabelStackSection5(74)<octetArray>",
    "mplsLabelStackSection6(75)<octetArray>",
    "mplsLabelStackSection7(76)<octetArray>",
    "mplsLabelStackSection8(77)<octetArray>",
    "mplsLabelStackSection9(78)<octetArray>",
    "mplsLabelStackSection10(79)<octetArray>",
    "destinationMacAddress(80)<macAddress>",
    "postSourceMacAddress(81)<macAddress>",
    "interfaceName(82)<string>",
    "interfaceDescription(83)<string>",
    "octetTotalCount(85)<unsigned64>",
    "packetTotalCount(86)<unsigned64>",
    "fragmentOffset(88)<unsigned16>",
    "mplsVpnRouteDistinguisher(90)<octetArray>",
    "mplsTopLabelPrefixLength(91)<unsigned8>",
    "applicationDescription(94)<string>",
    "applicationId(95)<octetArray>",
    "applicationName(96)<string>",
    "postIpDiffServCodePoint(98)<unsigned8>",
    "multicastReplicationFactor(99)<unsigned32>",
    "classificationEngineId(101)<unsigned8>",
    "exporterIPv4Address(130)<ipv4Address>",
    "exporterIPv6Address(131)<ipv6Address>",
    "droppedOctetDeltaCount(132)<unsigned64>",
    "droppedPacketDeltaCount(133)<unsigned64>",
    "droppedOctetTotalCount(134)<unsigned64>",
    "droppedPacketTotalCount(135)<unsigned64>",
    "flowEndReason(136)<unsigned8>",
    "commonPropertiesId(137)<unsigned64>",
    "observationPointId(138)<unsigned64>",
    "icmpTypeCodeIPv6(139)<unsigned16>",
    "mplsTopLabelIPv6Address(140)<ipv6Address>",
    "lineCardId(141)<unsigned32>",
    "portId(142)<unsigned32>",
    "meteringProcessId(143)<unsigned32>",
    "exportingProcessId(144)<unsigned32>",
    "templateId(145)<unsigned16>",
    "wlanChannelId(146)<unsigned8>",
    "wlanSSID(147)<string>",
    "flowId(148)<unsigned64>",
    "observationDomainId(149)<unsigned32>",
    "flowStartSeconds(150)<dateTimeSeconds>",
    "flowEndSeconds(151)<dateTimeSeconds>",
    "flowStartMilliseconds(152)<dateTimeMilliseconds>",
    "flowEndMilliseconds(153)<dateTimeMilliseconds>",
    "flowStartMicroseconds(154)<dateTimeMicroseconds>",
    "flowEndMicroseconds(155)<dateTimeMicroseconds>",
    "flowStartNanoseconds(156)<dateTimeNanoseconds>",
    "flowEndNanoseconds(157)<dateTimeNanoseconds>",
    "flowStartDeltaMicroseconds(158)<unsigned32>",
    "flowEndDeltaMicroseconds(159)<unsigned32>",
    "systemInitTimeMilliseconds(160)<dateTimeMilliseconds>",
    "flowDurationMilliseconds(161)<unsigned32>",
    "flowDurationMicroseconds(162)<unsigned32>",
    "observedFlowTotalCount(163)<unsigned64>",
    "ignoredPacketTotalCount(164)<unsigned64>",
    "ignoredOctetTotalCount(165)<unsigned64>",
    "notSentFlowTotalCount(166)<unsigned64>",
    "notSentPacketTotalCount(167)<unsigned64>",
    "notSentOctetTotalCount(168)<unsigned64>",
    "destinationIPv6Prefix(169)<ipv6Address>",
    "sourceIPv6Prefix(170)<ipv6Address>",
    "postOctetTotalCount(171)<unsigned64>",
    "postPacketTotalCount(172)<unsigned64>",
    "flowKeyIndicator(173)<unsigned64>",
    "postMCastPacketTotalCount(174)<unsigned64>",
    "postMCastOctetTotalCount(175)<unsigned64>",
    "icmpTypeIPv4(176)<unsigned8>",
    "icmpCodeIPv4(177)<unsigned8>",
    "icmpTypeIPv6(178)<unsigned8>",
    "icmpCodeIPv6(179)<unsigned8>",
    "udpSourcePort(180)<unsigned16>",
    "udpDestinationPort(181)<unsigned16>",
    "tcpSourcePort(182)<unsigned16>",
    "tcpDestinationPort(183)<unsigned16>",
    "tcpSequenceNumber(184)<unsigned32>",
    "tcpAcknowledgementNumber(185)<unsigned32>",
    "tcpWindowSize(186)<unsigned16>",
    "tcpUrgentPointer(187)<unsigned16>",
    "tcpHeaderLength(188)<unsigned8>",
    "ipHeaderLength(189)<unsigned8>",
    "totalLengthIPv4(190)<unsigned16>",
    "payloadLengthIPv6(191)<unsigned16>",
    "ipTTL(192)<unsigned8>",
    "nextHeaderIPv6(193)<unsigned8>",
    "mplsPayloadLength(194)<unsigned32>",
    "ipDiffServCodePoint(195)<unsigned8>",
    "ipPrecedence(196)<unsigned8>",
    "fragmentFlags(197)<unsigned8>",
    "octetDeltaSumOfSquares(198)<unsigned64>",
    "octetTotalSumOfSquares(199)<unsigned64>",
    "mplsTopLabelTTL(200)<unsigned8>",
    "mplsLabelStackLength(201)<unsigned32>",
    "mplsLabelStackDepth(202)<unsigned32>",
    "mplsTopLabelExp(203)<unsigned8>",
    "ipPayloadLength(204)<unsigned32>",
    "udpMessageLength(205)<unsigned16>",
    "isMulticast(206)<unsigned8>",
    "ipv4IHL(207)<unsigned8>",
    "ipv4Options(208)<unsigned32>",
    "tcpOptions(209)<unsigned64>",
    "paddingOctets(210)<octetArray>",
    "collectorIPv4Address(211)<ipv4Address>",
    "collectorIPv6Address(212)<ipv6Address>",
    "exportInterface(213)<unsigned32>",
    "exportProtocolVersion(214)<unsigned8>",
    "exportTransportProtocol(215)<unsigned8>",
    "collectorTransportPort(216)<unsigned16>",
    "exporterTransportPort(217)<unsigned16>",
    "tcpSynTotalCount(218)<unsigned64>",
    "tcpFinTotalCount(219)<unsigned64>",
    "tcpRstTotalCount(220)<unsigned64>",
    "tcpPshTotalCount(221)<unsigned64>",
    "tcpAckTotalCount(222)<unsigned64>",
    "tcpUrgTotalCount(223)<unsigned64>",
    "ipTotalLength(224)<unsigned64>",
    "postNATSourceIPv4Address(225)<ipv4Address>",
    "postNATDestinationIPv4Address(226)<ipv4Address>",
    "postNAPTSourceTransportPort(227)<unsigned16>",
    "postNAPTDestinationTransportPort(228)<unsigned16>",
    "natOriginatingAddressRealm(229)<unsigned8>",
    "natEvent(230)<unsigned8>",
    "initiatorOctets(231)<unsigned64>",
    "responderOctets(232)<unsigned64>",
    "firewallEvent(233)<unsigned8>",
    "ingressVRFID(234)<unsigned32>",
    "egressVRFID(235)<unsigned32>",
    "VRFname(236)<string>",
    "postMplsTopLabelExp(237)<unsigned8>",
    "tcpWindowScale(238)<unsigned16>",
    "biflowDirection(239)<unsigned8>",
    "ethernetHeaderLength(240)<unsigned8>",
    "ethernetPayloadLength(241)<unsigned16>",
    "ethernetTotalLength(242)<unsigned16>",
    "dot1qVlanId(243)<unsigned16>",
    "dot1qPriority(244)<unsigned8>",
    "dot1qCustomerVlanId(245)<unsigned16>",
    "dot1qCustomerPriority(246)<unsigned8>",
    "metroEvcId(247)<string>",
    "metroEvcType(248)<unsigned8>",
    "pseudoWireId(249)<unsigned32>",
    "pseudoWireType(250)<unsigned16>",
    "pseudoWireControlWord(251)<unsigned32>",
    "ingressPhysicalInterface(252)<unsigned32>",
    "egressPhysicalInterface(253)<unsigned32>",
    "postDot1qVlanId(254)<unsigned16>",
    "postDot1qCustomerVlanId(255)<unsigned16>",
    "ethernetType(256)<unsigned16>",
    "postIpPrecedence(257)<unsigned8>",
    "collectionTimeMilliseconds(258)<dateTimeMilliseconds>",
    "exportSctpStreamId(259)<unsigned16>",
    "maxExportSeconds(260)<dateTimeSeconds>",
    "maxFlowEndSeconds(261)<dateTimeSeconds>",
    "messageMD5Checksum(262)<octetArray>",
    "messageScope(263)<unsigned8>",
    "minExportSeconds(264)<dateTimeSeconds>",
    "minFlowStartSeconds(265)<dateTimeSeconds>",
    "opaqueOctets(266)<octetArray>",
    "sessionScope(267)<unsigned8>",
    "maxFlowEndMicroseconds(268)<dateTimeMicroseconds>",
    "maxFlowEndMilliseconds(269)<dateTimeMilliseconds>",
    "maxFlowEndNanoseconds(270)<dateTimeNanoseconds>",
    "minFlowStartMicroseconds(271)<dateTimeMicroseconds>",
    "minFlowStartMilliseconds(272)<dateTimeMilliseconds>",
    "minFlowStartNanoseconds(273)<dateTimeNanoseconds>",
    "collectorCertificate(274)<octetArray>",
    "exporterCertificate(275)<octetArray>",
    "dataRecordsReliability(276)<boolean>",
    "observationPointType(277)<unsigned8>",
    "newConnectionDeltaCount(278)<unsigned32>",
    "connectionSumDurationSeconds(279)<unsigned64>",
    "connectionTransactionId(280)<unsigned64>",
    "postNATSourceIPv6Address(281)<ipv6Address>",
    "postNATDestinationIPv6Address(282)<ipv6Address>",
    "natPoolId(283)<unsigned32>",
    "natPoolName(284)<string>",
    "anonymizationFlags(285)<unsigned16>",
    "anonymizationTechnique(286)<unsigned16>",
    "informationElementIndex(287)<unsigned16>",
    "p2pTechnology(288)<string>",
    "tunnelTechnology(289)<string>",
    "encryptedTechnology(290)<string>",
    "bgpValidityState(294)<unsigned8>",
    "IPSecSPI(295)<unsigned32>",
    "greKey(296)<unsigned32>",
    "natType(297)<unsigned8>",
    "initiatorPackets(298)<unsigned64>",
    "responderPackets(299)<unsigned64>",
    "observationDomainName(300)<string>",
    "selectionSequenceId(301)<unsigned64>",
    "selectorId(302)<unsigned64>",
    "informationElementId(303)<unsigned16>",
    "selectorAlgorithm(304)<unsigned16>",
    "samplingPacketInterval(305)<unsigned32>",
    "samplingPacketSpace(306)<unsigned32>",
    "samplingTimeInterval(307)<unsigned32>",
    "samplingTimeSpace(308)<unsigned32>",
    "samplingSize(309)<unsigned32>",
    "samplingPopulation(310)<unsigned32>",
    "samplingProbability(311)<float64>",
    "dataLinkFrameSize(312)<unsigned16>",
    "ipHeaderPacketSection(313)<octetArray>",
    "ipPayloadPacketSection(314)<octetArray>",
    "dataLinkFrameSection(315)<octetArray>",
    "mplsLabelStackSection(316)<octetArray>",
    "mplsPayloadPacketSection(317)<octetArray>",
    "selectorIdTotalPktsObserved(318)<unsigned64>",
    "selectorIdTotalPktsSelected(319)<unsigned64>",
    "absoluteError(320)<float64>",
    "relativeError(321)<float64>",
    "observationTimeSeconds(322)<dateTimeSeconds>",
    "observationTimeMilliseconds(323)<dateTimeMilliseconds>",
    "observationTimeMicroseconds(324)<dateTimeMicroseconds>",
    "observationTimeNanoseconds(325)<dateTimeNanoseconds>",
    "digestHashValue(326)<unsigned64>",
    "hashIPPayloadOffset(327)<unsigned64>",
    "hashIPPayloadSize(328)<unsigned64>",
    "hashOutputRangeMin(329)<unsigned64>",
    "hashOutputRangeMax(330)<unsigned64>",
    "hashSelectedRangeMin(331)<unsigned64>",
    "hashSelectedRangeMax(332)<unsigned64>",
    "hashDigestOutput(333)<boolean>",
    "hashInitialiserValue(334)<unsigned64>",
    "selectorName(335)<string>",
    "upperCILimit(336)<float64>",
    "lowerCILimit(337)<float64>",
    "confidenceLevel(338)<float64>",
    "informationElementDataType(339)<unsigned8>",
    "informationElementDescription(340)<string>",
    "informationElementName(341)<string>",
    "informationElementRangeBegin(342)<unsigned64>",
    "informationElementRangeEnd(343)<unsigned64>",
    "informationElementSemantics(344)<unsigned8>",
    "informationElementUnits(345)<unsigned16>",
    "privateEnterpriseNumber(346)<unsigned32>",
];

// Elements RFC 5103 does not reverse: padding carries no direction, and the
// biflow-direction element describes the record itself.
pub(crate) const NON_REVERSIBLE_NUMS: &[u16] = &[210, 239];
